//! Query router.
//!
//! Each read operation picks the view and partition(s) that serve it:
//!
//! - direct lookups read one row of the by-identifier view
//! - scoped listings read two by-scope partitions (the global one and the caller's scope)
//!   and concatenate the results
//! - departure queries scan one by-departure partition over a time range

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument, trace};
use vessel_registry_shared::{CategoryReference, PortReference, ScopeReference, Vessel, VesselId};

use crate::errors::VesselRepositoryError;
use crate::interfaces::PartitionedRecordStore;
use crate::types::{ClusteringRange, ColumnFilter, ScanRequest, ViewName};
use crate::utils::require_non_blank;
use crate::views::{identifier_key, is_reserved_scope, visible_partition_keys};

/// Routes read operations to the views serving them.
pub struct QueryRouter {
    store: Arc<dyn PartitionedRecordStore>,
    departure_window: Duration,
}

impl QueryRouter {
    /// Create a router reading from `store`.
    ///
    /// `departure_window` is how far back [`QueryRouter::find_recent_departures_by_port`]
    /// looks.
    pub fn new(store: Arc<dyn PartitionedRecordStore>, departure_window: Duration) -> Self {
        Self {
            store,
            departure_window,
        }
    }

    /// Look a vessel up by identifier.
    #[instrument(skip(self), fields(vessel_id = %id))]
    pub async fn find_by_identifier(
        &self,
        id: VesselId,
    ) -> Result<Option<Vessel>, VesselRepositoryError> {
        let row = self.store.get(&identifier_key(id)).await?;
        trace!(
            vessel_id = %id,
            found = row.is_some(),
            "Looked up vessel by ID"
        );
        Ok(row.map(|row| row.into_vessel()))
    }

    /// List every vessel visible to `scope`: all global vessels plus the scope's own.
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn find_all_visible(
        &self,
        scope: &ScopeReference,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        self.scan_visible(scope, None).await
    }

    /// List the vessels visible to `scope` whose name contains `fragment`, ignoring case.
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn find_by_name_fragment(
        &self,
        scope: &ScopeReference,
        fragment: &str,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        self.scan_visible(scope, Some(ColumnFilter::NameContains(fragment.to_string())))
            .await
    }

    /// List the vessels visible to `scope` that belong to `category`.
    #[instrument(skip(self, scope, category), fields(scope = %scope, category = %category))]
    pub async fn find_by_category(
        &self,
        scope: &ScopeReference,
        category: &CategoryReference,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        require_non_blank("category", category.as_str())?;
        self.scan_visible(scope, Some(ColumnFilter::CategoryEquals(category.clone())))
            .await
    }

    /// List the vessels whose last departure left `port` within the departure window.
    ///
    /// Results are ordered by departure time, oldest first.
    #[instrument(
        skip(self, port),
        fields(port = %port, window_hours = self.departure_window.num_hours())
    )]
    pub async fn find_recent_departures_by_port(
        &self,
        port: &PortReference,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        let since = Utc::now() - self.departure_window;
        self.find_departures_by_port_since(port, since).await
    }

    /// List the vessels whose last departure left `port` strictly after `since`.
    #[instrument(skip(self, port), fields(port = %port))]
    pub async fn find_departures_by_port_since(
        &self,
        port: &PortReference,
        since: DateTime<Utc>,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        require_non_blank("port", port.as_str())?;

        let request = ScanRequest::partition(ViewName::ByDeparture, port.as_str())
            .with_range(ClusteringRange::After(since));
        let rows = self.store.scan(&request).await?;

        debug!(port = %port, matches = rows.len(), "Found recent departures");
        Ok(rows.into_iter().map(|row| row.into_vessel()).collect())
    }

    /// Scan the global partition and the scope's partition of the by-scope view.
    ///
    /// A vessel lives in exactly one of the two partitions, so the union needs no
    /// deduplication.
    async fn scan_visible(
        &self,
        scope: &ScopeReference,
        filter: Option<ColumnFilter>,
    ) -> Result<Vec<Vessel>, VesselRepositoryError> {
        require_non_blank("scope", scope.as_str())?;
        if is_reserved_scope(scope) {
            return Err(VesselRepositoryError::invalid_argument(format!(
                "scope {} is reserved",
                scope
            )));
        }

        let mut vessels = Vec::new();
        for partition_key in visible_partition_keys(scope) {
            let mut request = ScanRequest::partition(ViewName::ByScope, partition_key);
            request.filter = filter.clone();

            let rows = self.store.scan(&request).await?;
            trace!(
                partition = %request.partition_key,
                matches = rows.len(),
                "Scanned by-scope partition"
            );
            vessels.extend(rows.into_iter().map(|row| row.into_vessel()));
        }

        debug!(scope = %scope, matches = vessels.len(), "Found visible vessels");
        Ok(vessels)
    }
}
