//! Interface definitions for the backing record store.
//!
//! This module defines the abstract `PartitionedRecordStore` trait that the coordinators
//! and the query router are built on, allowing swappable store implementations.

mod partitioned_record_store;

pub use partitioned_record_store::PartitionedRecordStore;
