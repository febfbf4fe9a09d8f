//! Configuration types for the VesselService.

use std::env;

use chrono::Duration;
use tracing::warn;

/// How far back "recent" departures reach, in hours.
pub const DEFAULT_DEPARTURE_WINDOW_HOURS: i64 = 20;

/// Environment variable overriding the departure window, in hours.
pub const DEPARTURE_WINDOW_ENV: &str = "VESSEL_DEPARTURE_WINDOW_HOURS";

/// Configuration for the VesselService.
#[derive(Debug, Clone)]
pub struct VesselServiceConfig {
    /// Window considered recent by the departure query.
    ///
    /// Defaults to 20 hours.
    pub departure_window: Duration,

    /// Whether `update` removes rows left under keys derived from the previous state.
    ///
    /// When a key-bearing attribute changes (visibility, creation scope, departure port or
    /// time), the previous state's rows live under other keys than the new ones. With this
    /// enabled, `update` reads the previous state and deletes those rows in the same batch
    /// as the upserts. Defaults to `true`.
    pub cleanup_stale_rows: bool,
}

impl Default for VesselServiceConfig {
    fn default() -> Self {
        Self {
            departure_window: Duration::hours(DEFAULT_DEPARTURE_WINDOW_HOURS),
            cleanup_stale_rows: true,
        }
    }
}

impl VesselServiceConfig {
    /// Create a config with a custom departure window.
    pub fn with_departure_window(departure_window: Duration) -> Self {
        Self {
            departure_window,
            ..Self::default()
        }
    }

    /// Disable the cleanup of rows derived from a previous state.
    ///
    /// # Warning
    ///
    /// With cleanup disabled, changing the visibility or the departure of a vessel leaves
    /// its previous by-scope or by-departure row in place, where scans still find it.
    pub fn without_stale_row_cleanup(self) -> Self {
        Self {
            cleanup_stale_rows: false,
            ..self
        }
    }

    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VESSEL_DEPARTURE_WINDOW_HOURS`: departure window in hours (default: 20)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(DEPARTURE_WINDOW_ENV) {
            match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => config.departure_window = Duration::hours(hours),
                _ => warn!(
                    value = %raw,
                    "Invalid {}, using default of {} hours",
                    DEPARTURE_WINDOW_ENV,
                    DEFAULT_DEPARTURE_WINDOW_HOURS
                ),
            }
        }
        config
    }
}
