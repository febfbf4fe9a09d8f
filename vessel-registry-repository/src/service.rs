//! Vessel registry service implementation.
//!
//! This module provides the main entry point for the registry. Application code uses it
//! to add, update and remove vessels and to run the five read operations.
//!
//! # Note on Updates
//!
//! `update` is an upsert: it creates the vessel under the supplied identifier when nothing
//! is stored there yet. `add` is the only operation that generates identifiers.

use std::sync::Arc;

use tracing::debug;
use vessel_registry_shared::{CategoryReference, PortReference, ScopeReference, Vessel, VesselId};

use crate::config::VesselServiceConfig;
use crate::coordinators::{DeleteCoordinator, WriteCoordinator};
use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::query::QueryRouter;
use crate::utils::parse_vessel_id;

/// The main service for interacting with the vessel registry.
///
/// This is the high-level API that application code should use. It validates caller
/// input, then delegates writes to the [`WriteCoordinator`], deletes to the
/// [`DeleteCoordinator`] and reads to the [`QueryRouter`], all sharing one injected
/// [`PartitionedRecordStore`]. All operations return `VesselRepositoryError` for
/// consistent error handling.
///
/// The service holds no mutable state and can be shared behind an `Arc` by concurrent
/// callers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vessel_registry_repository::{InMemoryRecordStore, VesselService};
/// use vessel_registry_shared::{ScopeReference, Vessel, Visibility};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = VesselService::new(Arc::new(InMemoryRecordStore::new()));
///
/// let vessel = Vessel::builder()
///     .with_name("Le_Name")
///     .with_category("Cargo")
///     .with_visibility(Visibility::Global)
///     .with_creation_scope("Le_center")
///     .build()?;
///
/// let id = service.add(vessel).await?;
/// let visible = service.find_all(&ScopeReference::new("another_center")).await?;
/// assert_eq!(visible[0].id(), Some(id));
/// # Ok(())
/// # }
/// ```
pub struct VesselService {
    writer: WriteCoordinator,
    deleter: DeleteCoordinator,
    router: QueryRouter,
    config: VesselServiceConfig,
}

impl VesselService {
    /// Create a new VesselService with default configuration.
    ///
    /// The default configuration uses a 20 hour departure window and cleans up stale rows
    /// on update.
    ///
    /// # Arguments
    ///
    /// * `store` - The record store holding every view (e.g., `PostgresRecordStore`)
    pub fn new(store: Arc<dyn PartitionedRecordStore>) -> Self {
        Self::with_config(store, VesselServiceConfig::default())
    }

    /// Create a new VesselService with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - The record store holding every view
    /// * `config` - Custom configuration for the service
    pub fn with_config(store: Arc<dyn PartitionedRecordStore>, config: VesselServiceConfig) -> Self {
        Self {
            writer: WriteCoordinator::new(store.clone(), config.cleanup_stale_rows),
            deleter: DeleteCoordinator::new(store.clone()),
            router: QueryRouter::new(store, config.departure_window),
            config,
        }
    }

    pub fn config(&self) -> &VesselServiceConfig {
        &self.config
    }

    /// Store a new vessel under a freshly generated identifier.
    ///
    /// Any identifier carried by `vessel` is ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(VesselId)` - The identifier the vessel was stored under
    /// * `Err(VesselRepositoryError::StorageError)` - If the write batch failed
    pub async fn add(&self, vessel: Vessel) -> Result<VesselId, VesselRepositoryError> {
        let id = VesselId::generate();
        if let Some(ignored) = vessel.id() {
            debug!(ignored = %ignored, vessel_id = %id, "Replacing caller-supplied ID on add");
        }

        self.writer.insert(id, &vessel.with_id(id)).await?;
        Ok(id)
    }

    /// Store a vessel under its own identifier, replacing the previous state.
    ///
    /// Creates the vessel when nothing is stored under its identifier.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If every view was written
    /// * `Err(VesselRepositoryError::InvalidArgument)` - If the vessel has no identifier
    /// * `Err(VesselRepositoryError::StorageError)` - If the write batch failed
    pub async fn update(&self, vessel: Vessel) -> Result<(), VesselRepositoryError> {
        let id = vessel.id().ok_or_else(|| {
            VesselRepositoryError::invalid_argument("vessel id is required for an update")
        })?;

        self.writer.upsert(id, &vessel).await
    }

    /// Remove the vessel stored under `id` from every view.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vessel))` - The removed state
    /// * `Ok(None)` - If no vessel was stored under `id`
    /// * `Err(VesselRepositoryError::InvalidArgument)` - If `id` is not a valid identifier
    /// * `Err(VesselRepositoryError::StorageError)` - If the lookup or the delete batch failed
    pub async fn remove(&self, id: &str) -> Result<Option<Vessel>, VesselRepositoryError> {
        let id = parse_vessel_id(id)?;
        self.deleter.remove(id).await
    }

    /// Look a vessel up by identifier.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Vessel))` - If the vessel exists
    /// * `Ok(None)` - If no vessel is stored under `id`
    /// * `Err(VesselRepositoryError::InvalidArgument)` - If `id` is not a valid identifier
    pub async fn find(&self, id: &str) -> Result<Option<Vessel>, VesselRepositoryError> {
        let id = parse_vessel_id(id)?;
        self.router.find_by_identifier(id).await
    }

    /// List every vessel visible to `scope`.
    pub async fn find_all(
        &self,
        scope: &ScopeReference,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        self.router.find_all_visible(scope).await
    }

    /// List the vessels visible to `scope` whose name contains `fragment`, ignoring case.
    pub async fn find_by_name_fragment(
        &self,
        scope: &ScopeReference,
        fragment: &str,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        self.router.find_by_name_fragment(scope, fragment).await
    }

    /// List the vessels visible to `scope` in `category`.
    pub async fn find_by_category(
        &self,
        scope: &ScopeReference,
        category: &CategoryReference,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        self.router.find_by_category(scope, category).await
    }

    /// List the vessels that left `port` within the configured departure window.
    pub async fn find_by_departure_port(
        &self,
        port: &PortReference,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        self.router.find_recent_departures_by_port(port).await
    }
}
