//! In-memory implementation of the partitioned record store.
//!
//! Used by tests and local runs that have no database at hand.

mod record_store;

pub use record_store::InMemoryRecordStore;
