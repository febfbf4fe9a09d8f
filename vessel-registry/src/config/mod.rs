//! Configuration and dependency initialization for the vessel registry service.

mod dependencies;

pub use dependencies::{ConnectionMode, Dependencies, ServerConfig};
