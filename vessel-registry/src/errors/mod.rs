//! Error types for the vessel registry service.

use thiserror::Error;
use vessel_registry_repository::VesselRepositoryError;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the vessel repository.
    #[error("Repository error: {0}")]
    RepositoryError(#[from] VesselRepositoryError),

    /// Listener or socket error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RegistryError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
