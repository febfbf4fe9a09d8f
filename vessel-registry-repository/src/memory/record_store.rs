use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::types::{BatchOperation, ClusteringValue, RowKey, ScanRequest, ViewName, ViewRow};

type Partition = BTreeMap<Vec<ClusteringValue>, ViewRow>;

/// In-process partitioned record store.
///
/// Partitions are keyed by (view, partition key) and keep their rows sorted by clustering
/// key. A batch is applied under a single write lock, so readers never observe half of it.
#[derive(Default)]
pub struct InMemoryRecordStore {
    partitions: RwLock<HashMap<(ViewName, String), Partition>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored across every view.
    pub async fn row_count(&self) -> usize {
        self.partitions.read().await.values().map(BTreeMap::len).sum()
    }

    /// Number of rows stored in one view.
    pub async fn view_row_count(&self, view: ViewName) -> usize {
        self.partitions
            .read()
            .await
            .iter()
            .filter(|((partition_view, _), _)| *partition_view == view)
            .map(|(_, partition)| partition.len())
            .sum()
    }
}

#[async_trait]
impl PartitionedRecordStore for InMemoryRecordStore {
    async fn get(&self, key: &RowKey) -> Result<Option<ViewRow>, VesselRepositoryError> {
        let partitions = self.partitions.read().await;
        Ok(partitions
            .get(&(key.view, key.partition_key.clone()))
            .and_then(|partition| partition.get(&key.clustering_key))
            .cloned())
    }

    async fn scan(&self, request: &ScanRequest) -> Result<Vec<ViewRow>, VesselRepositoryError> {
        request.check_supported()?;

        let partitions = self.partitions.read().await;
        let Some(partition) = partitions.get(&(request.view, request.partition_key.clone())) else {
            return Ok(Vec::new());
        };

        Ok(partition
            .values()
            .filter(|row| request.accepts(row))
            .cloned()
            .collect())
    }

    async fn submit_batch(&self, batch: &[BatchOperation]) -> Result<(), VesselRepositoryError> {
        let mut partitions = self.partitions.write().await;

        for operation in batch {
            match operation {
                BatchOperation::Upsert(row) => {
                    trace!(key = %row.key, "Upserting row");
                    partitions
                        .entry((row.key.view, row.key.partition_key.clone()))
                        .or_default()
                        .insert(row.key.clustering_key.clone(), row.clone());
                }
                BatchOperation::Delete(key) => {
                    trace!(key = %key, "Deleting row");
                    let partition_id = (key.view, key.partition_key.clone());
                    if let Some(partition) = partitions.get_mut(&partition_id) {
                        partition.remove(&key.clustering_key);
                        if partition.is_empty() {
                            partitions.remove(&partition_id);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
