//! Partitioned record store trait definition.
//!
//! This module defines the abstract interface of the wide-column store the registry
//! writes its views to.

use async_trait::async_trait;

use crate::errors::VesselRepositoryError;
use crate::types::{BatchOperation, RowKey, ScanRequest, ViewRow};

/// Abstracts the partitioned store holding every view of the registry.
///
/// Implementations are injected as `Arc<dyn PartitionedRecordStore>` into the coordinators
/// and the query router; their connection lifecycle is owned by the caller. Retry policy,
/// consistency level and timeouts are configuration of the implementation.
///
/// All methods return `Result<T, VesselRepositoryError>`; backend failures are reported as
/// `VesselRepositoryError::StorageError`.
///
/// # Atomicity
///
/// `submit_batch` is a single request from the caller's perspective. Implementations are
/// not required to apply it atomically across partitions: when it fails, some operations
/// may have been applied and others not.
#[async_trait]
pub trait PartitionedRecordStore: Send + Sync {
    /// Read the row stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ViewRow))` - If the row exists
    /// * `Ok(None)` - If no row is stored under the key
    /// * `Err(VesselRepositoryError)` - If the read fails
    async fn get(&self, key: &RowKey) -> Result<Option<ViewRow>, VesselRepositoryError>;

    /// Read the rows of one partition that satisfy the request's range and filter.
    ///
    /// Predicates are evaluated by the store. Rows are returned in clustering order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ViewRow>)` - Matching rows, possibly empty
    /// * `Err(VesselRepositoryError)` - If the scan fails
    async fn scan(&self, request: &ScanRequest) -> Result<Vec<ViewRow>, VesselRepositoryError>;

    /// Submit upserts and deletes across views as one request.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every operation was accepted
    /// * `Err(VesselRepositoryError)` - If the submission failed, possibly partially
    async fn submit_batch(&self, batch: &[BatchOperation]) -> Result<(), VesselRepositoryError>;
}
