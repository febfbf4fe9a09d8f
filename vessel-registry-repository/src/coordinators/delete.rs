//! Delete fan-out coordinator.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};
use vessel_registry_shared::{Vessel, VesselId};

use crate::coordinators::load_canonical;
use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::types::BatchOperation;
use crate::views::row_keys_for;

/// Removes a vessel from every view it was written to, as one batch.
///
/// The rows to delete are derived from the state read back from the by-identifier view,
/// never from a caller-supplied state, using the same key derivation as the write path.
pub struct DeleteCoordinator {
    store: Arc<dyn PartitionedRecordStore>,
}

impl DeleteCoordinator {
    pub fn new(store: Arc<dyn PartitionedRecordStore>) -> Self {
        Self { store }
    }

    /// Remove the vessel stored under `id`.
    ///
    /// Removing an absent vessel is a successful no-op, logged as a warning.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vessel))` - The removed state
    /// * `Ok(None)` - If nothing was stored under `id`
    /// * `Err(VesselRepositoryError::StorageError)` - If the lookup or the batch failed;
    ///   some views may already have been cleared
    #[instrument(skip(self), fields(vessel_id = %id))]
    pub async fn remove(&self, id: VesselId) -> Result<Option<Vessel>, VesselRepositoryError> {
        let Some(vessel) = load_canonical(self.store.as_ref(), id).await? else {
            warn!(vessel_id = %id, "No vessel found with this ID, nothing to remove");
            return Ok(None);
        };

        let batch = Self::build_batch(id, &vessel);
        debug!(vessel_id = %id, operations = batch.len(), "Submitting delete batch");

        if let Err(e) = self.store.submit_batch(&batch).await {
            error!(vessel_id = %id, error = %e, "Delete batch failed");
            return Err(e);
        }

        info!(vessel_id = %id, operations = batch.len(), "Vessel removed");
        Ok(Some(vessel))
    }

    /// Build the batch removing every row `vessel` has under `id`.
    pub fn build_batch(id: VesselId, vessel: &Vessel) -> Vec<BatchOperation> {
        row_keys_for(id, vessel)
            .into_iter()
            .map(BatchOperation::Delete)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinators::WriteCoordinator;
    use chrono::Utc;
    use vessel_registry_shared::Visibility;

    #[test]
    fn test_delete_keys_match_write_keys() {
        let id = VesselId::generate();
        let vessel = Vessel::builder()
            .with_name("Le_Name")
            .with_category("Cargo")
            .with_visibility(Visibility::Global)
            .with_creation_scope("Le_center")
            .with_departure("brest", Utc::now())
            .build()
            .unwrap();

        let written: Vec<_> = WriteCoordinator::build_batch(id, &vessel, None)
            .iter()
            .map(|op| op.key().clone())
            .collect();
        let deleted: Vec<_> = DeleteCoordinator::build_batch(id, &vessel)
            .iter()
            .map(|op| op.key().clone())
            .collect();

        assert_eq!(written, deleted);
        assert!(DeleteCoordinator::build_batch(id, &vessel)
            .iter()
            .all(|op| matches!(op, BatchOperation::Delete(_))));
    }
}
