//! Vessel repository error types.
//!
//! This module defines the unified error type for registry operations, covering caller
//! mistakes (invalid entities, malformed keys) and failures of the backing record store.

use thiserror::Error;
use vessel_registry_shared::VesselValidationError;

/// Unified errors from vessel registry operations.
///
/// Used by the `PartitionedRecordStore` trait, the coordinators, the query router and
/// `VesselService`. Absence of a vessel is never reported through this type: lookups and
/// deletes return an `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VesselRepositoryError {
    /// The entity failed its construction invariants.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A caller-supplied key or identifier is empty or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store failed or timed out on a get, scan or batch submission.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl VesselRepositoryError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }
}

impl From<VesselValidationError> for VesselRepositoryError {
    fn from(err: VesselValidationError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<sqlx::Error> for VesselRepositoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for VesselRepositoryError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StorageError(format!("migration failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_validation_error() {
        let err: VesselRepositoryError = VesselValidationError::missing("name").into();

        assert_eq!(
            err,
            VesselRepositoryError::ValidationError("name is mandatory".to_string())
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            VesselRepositoryError::invalid_argument("scope is required").to_string(),
            "Invalid argument: scope is required"
        );
        assert_eq!(
            VesselRepositoryError::storage("timeout").to_string(),
            "Storage error: timeout"
        );
    }
}
