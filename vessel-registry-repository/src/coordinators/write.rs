//! Write fan-out coordinator.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use vessel_registry_shared::{Vessel, VesselId};

use crate::coordinators::load_canonical;
use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::types::{BatchOperation, RowKey};
use crate::views::{is_reserved_scope, row_keys_for, rows_for};

/// Writes a vessel to every view it is relevant to, as one batch.
///
/// The coordinator is stateless apart from its store handle and can be shared between
/// concurrent callers.
pub struct WriteCoordinator {
    store: Arc<dyn PartitionedRecordStore>,
    cleanup_stale_rows: bool,
}

impl WriteCoordinator {
    /// Create a coordinator writing to `store`.
    ///
    /// With `cleanup_stale_rows`, `upsert` also deletes the rows of the previous state that
    /// the new state no longer maps to.
    pub fn new(store: Arc<dyn PartitionedRecordStore>, cleanup_stale_rows: bool) -> Self {
        Self {
            store,
            cleanup_stale_rows,
        }
    }

    /// Write the vessel under `id`, replacing whatever was stored under it.
    ///
    /// Acts as an insert when nothing is stored under `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the batch was accepted
    /// * `Err(VesselRepositoryError::ValidationError)` - If the creation scope is reserved;
    ///   nothing is read or written
    /// * `Err(VesselRepositoryError::StorageError)` - If reading the previous state or
    ///   submitting the batch failed; some views may already have been written
    #[instrument(skip(self, vessel), fields(vessel_id = %id))]
    pub async fn upsert(&self, id: VesselId, vessel: &Vessel) -> Result<(), VesselRepositoryError> {
        Self::check_scope(vessel)?;

        let previous = if self.cleanup_stale_rows {
            load_canonical(self.store.as_ref(), id).await?
        } else {
            None
        };

        let batch = Self::build_batch(id, vessel, previous.as_ref());
        self.submit(id, &batch).await
    }

    /// Write a vessel whose identifier was just generated.
    ///
    /// No previous state can exist, so nothing is read before writing.
    #[instrument(skip(self, vessel), fields(vessel_id = %id))]
    pub async fn insert(&self, id: VesselId, vessel: &Vessel) -> Result<(), VesselRepositoryError> {
        Self::check_scope(vessel)?;

        let batch = Self::build_batch(id, vessel, None);
        self.submit(id, &batch).await
    }

    /// Build the batch writing `vessel` under `id`.
    ///
    /// Holds one upsert per relevant view, in registry order. When `previous` is given,
    /// the batch starts with a delete for every key of the previous state that the new
    /// state does not reuse.
    pub fn build_batch(
        id: VesselId,
        vessel: &Vessel,
        previous: Option<&Vessel>,
    ) -> Vec<BatchOperation> {
        let rows = rows_for(id, vessel);
        let mut batch = Vec::with_capacity(rows.len() + 1);

        if let Some(previous) = previous {
            let current_keys: HashSet<&RowKey> = rows.iter().map(|row| &row.key).collect();
            for stale_key in row_keys_for(id, previous)
                .into_iter()
                .filter(|key| !current_keys.contains(key))
            {
                warn!(
                    vessel_id = %id,
                    key = %stale_key,
                    "Removing row left under a key of the previous state"
                );
                batch.push(BatchOperation::Delete(stale_key));
            }
        }

        batch.extend(rows.into_iter().map(BatchOperation::Upsert));
        batch
    }

    fn check_scope(vessel: &Vessel) -> Result<(), VesselRepositoryError> {
        if is_reserved_scope(vessel.creation_scope()) {
            return Err(VesselRepositoryError::validation(format!(
                "creation scope {} is reserved",
                vessel.creation_scope()
            )));
        }
        Ok(())
    }

    async fn submit(
        &self,
        id: VesselId,
        batch: &[BatchOperation],
    ) -> Result<(), VesselRepositoryError> {
        debug!(vessel_id = %id, operations = batch.len(), "Submitting write batch");

        if let Err(e) = self.store.submit_batch(batch).await {
            error!(vessel_id = %id, error = %e, "Write batch failed");
            return Err(e);
        }

        info!(vessel_id = %id, operations = batch.len(), "Vessel written");
        Ok(())
    }
}
