//! Error types for the vessel registry repository.
//!
//! This module provides a unified error type for all registry operations.

mod vessel_repository_error;

pub use vessel_repository_error::VesselRepositoryError;
