//! Write and delete fan-out.
//!
//! Both coordinators turn one logical operation on a vessel into a single batch of
//! per-view operations, using the view registry to decide which views take part.

mod delete;
mod write;

pub use delete::DeleteCoordinator;
pub use write::WriteCoordinator;

use tracing::debug;
use vessel_registry_shared::{Vessel, VesselId};

use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::views::identifier_key;

/// Read the last written canonical state of a vessel from the by-identifier view.
pub(crate) async fn load_canonical(
    store: &dyn PartitionedRecordStore,
    id: VesselId,
) -> Result<Option<Vessel>, VesselRepositoryError> {
    let row = store.get(&identifier_key(id)).await?;
    debug!(vessel_id = %id, found = row.is_some(), "Loaded canonical vessel state");
    Ok(row.map(|row| row.into_vessel()))
}
