//! Core data structures of the vessel registry.
//!
//! Re-exports the canonical `Vessel` aggregate and its value types.

pub mod departure;
pub mod references;
pub mod vessel;
pub mod visibility;

pub use departure::Departure;
pub use references::{CategoryReference, PortReference, ScopeReference, VesselId};
pub use vessel::{Vessel, VesselBuilder};
pub use visibility::Visibility;
