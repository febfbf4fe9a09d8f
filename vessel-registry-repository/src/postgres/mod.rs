//! PostgreSQL implementation of the partitioned record store.
//!
//! ## Database Tables
//!
//! - `vessels_by_uuid`: by-identifier view
//! - `vessels`: by-scope view, with the denormalized name and category columns
//! - `vessels_by_departure_port`: by-departure view
//!
//! Migrations live in `src/postgres/migrations` and are embedded in the binary.

mod record_store;

pub use record_store::PostgresRecordStore;
