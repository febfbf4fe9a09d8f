//! # Vessel Registry
//!
//! HTTP service for the vessel directory. It wires a PostgreSQL record store into the
//! `VesselService` and exposes its operations as a small JSON API.
//!
//! ## Modules
//!
//! - [`api`]: routes, handlers and request/response bodies
//! - [`config`]: environment configuration and dependency initialization
//! - [`errors`]: error types for the service

pub mod api;
pub mod config;
pub mod errors;

pub use config::{ConnectionMode, Dependencies, ServerConfig};
pub use errors::RegistryError;
