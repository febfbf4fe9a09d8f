//! Vessel departure information.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::types::references::PortReference;

/// Last departure of a vessel: the port it left and when.
///
/// Both parts are always present. The departure time is truncated to millisecond
/// precision, the resolution the backing stores keep for clustering timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Departure {
    port: PortReference,
    time: DateTime<Utc>,
}

impl Departure {
    /// Create departure information from a port and a time.
    pub fn new(port: PortReference, time: DateTime<Utc>) -> Self {
        Self {
            port,
            time: time.trunc_subsecs(3),
        }
    }

    /// Get the departure port.
    pub fn port(&self) -> &PortReference {
        &self.port
    }

    /// Get the departure time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

impl fmt::Display for Departure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Left {} at {}", self.port, self.time.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_is_truncated_to_millis() {
        let time = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let departure = Departure::new(PortReference::new("brest"), time);

        assert_eq!(departure.time().timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(departure.port().as_str(), "brest");
    }
}
