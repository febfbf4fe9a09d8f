//! # Vessel Registry Shared
//!
//! This crate defines the domain types shared across the vessel registry: the canonical
//! `Vessel` aggregate, its builder, and the value types it is made of.

pub mod errors;
pub mod types;

pub use errors::VesselValidationError;
pub use types::departure::Departure;
pub use types::references::{CategoryReference, PortReference, ScopeReference, VesselId};
pub use types::vessel::{Vessel, VesselBuilder};
pub use types::visibility::Visibility;
