//! Validation errors raised while building domain values.

use thiserror::Error;

/// Errors raised when a `Vessel` (or one of its parts) fails its construction invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VesselValidationError {
    /// A mandatory field was never set on the builder.
    #[error("{0} is mandatory")]
    MissingField(&'static str),

    /// A field was set but is empty or blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl VesselValidationError {
    /// Create a missing field error.
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField(field)
    }

    /// Create an empty field error.
    pub fn empty(field: &'static str) -> Self {
        Self::EmptyField(field)
    }
}
