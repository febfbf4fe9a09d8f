//! # Vessel Registry Repository
//!
//! This crate keeps several denormalized views of every vessel consistent over a
//! partitioned record store. It includes the view registry, the write and delete
//! fan-out coordinators, the query router, the `VesselService` facade, and two store
//! implementations: in-memory and PostgreSQL.

pub mod config;
pub mod coordinators;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod service;
pub mod types;
pub mod utils;
pub mod views;

pub use config::VesselServiceConfig;
pub use coordinators::{DeleteCoordinator, WriteCoordinator};
pub use errors::VesselRepositoryError;
pub use interfaces::PartitionedRecordStore;
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use query::QueryRouter;
pub use service::VesselService;
pub use types::{
    BatchOperation, ClusteringRange, ClusteringValue, ColumnFilter, RowColumns, RowKey,
    ScanRequest, ViewName, ViewRow,
};
pub use utils::parse_vessel_id;
