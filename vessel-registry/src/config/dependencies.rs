//! Dependency initialization and wiring for the vessel registry service.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::time::sleep;
use tracing::{info, warn};
use vessel_registry_repository::{PostgresRecordStore, VesselService, VesselServiceConfig};

use crate::RegistryError;

/// Default maximum number of pooled database connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default address the HTTP server binds to.
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at a fixed interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid DATABASE_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_address: SocketAddr,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl ServerConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `BIND_ADDRESS`: HTTP listen address (default: 0.0.0.0:8080)
    /// - `DATABASE_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `DATABASE_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from any variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, RegistryError> {
        let database_url = get("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| RegistryError::config("DATABASE_URL is required"))?;

        let max_connections = get("DATABASE_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let raw_address = get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = raw_address.parse::<SocketAddr>().map_err(|e| {
            RegistryError::config(format!("Invalid BIND_ADDRESS {}: {}", raw_address, e))
        })?;

        let connection_mode = ConnectionMode::parse(get("DATABASE_CONNECTION_MODE").as_deref());
        let retry_interval = get("DATABASE_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        Ok(Self {
            database_url,
            max_connections,
            bind_address,
            connection_mode,
            retry_interval: Duration::from_secs(retry_interval),
        })
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The vessel service, shared by every request handler.
    pub service: Arc<VesselService>,
    /// Address the HTTP server binds to.
    pub bind_address: SocketAddr,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`ServerConfig::from_env`] and [`VesselServiceConfig::from_env`] for the
    /// variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(RegistryError)` - If configuration is invalid, or the database cannot be
    ///   reached in fail-fast mode, or migrations fail
    pub async fn new() -> Result<Self, RegistryError> {
        let config = ServerConfig::from_env()?;
        let service_config = VesselServiceConfig::from_env();

        info!(
            bind_address = %config.bind_address,
            max_connections = config.max_connections,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            departure_window_hours = service_config.departure_window.num_hours(),
            cleanup_stale_rows = service_config.cleanup_stale_rows,
            "Initializing dependencies"
        );

        let pool = Self::connect_to_postgres(&config).await?;
        info!("PostgreSQL connection established");

        let store = PostgresRecordStore::new(pool);
        store.migrate().await?;
        info!("Database schema is up to date");

        let service = VesselService::with_config(Arc::new(store), service_config);

        Ok(Self {
            service: Arc::new(service),
            bind_address: config.bind_address,
        })
    }

    /// Connect to PostgreSQL with retry logic based on connection mode.
    async fn connect_to_postgres(config: &ServerConfig) -> Result<PgPool, RegistryError> {
        loop {
            let attempt = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await;

            match attempt {
                Ok(pool) => return Ok(pool),
                Err(e) => match config.connection_mode {
                    ConnectionMode::FailFast => {
                        return Err(RegistryError::config(format!(
                            "Failed to connect to PostgreSQL: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = config.retry_interval.as_secs(),
                            "Failed to connect to PostgreSQL, retrying..."
                        );
                        sleep(config.retry_interval).await;
                    }
                },
            }
        }
    }
}
