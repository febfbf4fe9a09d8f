//! Row, key and request types exchanged with the partitioned record store.

use std::fmt;

use chrono::{DateTime, Utc};
use vessel_registry_shared::{CategoryReference, Vessel, VesselId};

use crate::errors::VesselRepositoryError;

/// The denormalized views a vessel can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewName {
    /// Partitioned by vessel identifier. Serves direct lookups.
    ById,
    /// Partitioned by visibility key, clustered by identifier. Serves scoped listings.
    ByScope,
    /// Partitioned by last departure port, clustered by (departure time, identifier).
    ByDeparture,
}

impl ViewName {
    /// Name of the table backing this view.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::ById => "vessels_by_uuid",
            Self::ByScope => "vessels",
            Self::ByDeparture => "vessels_by_departure_port",
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// One component of a clustering key.
///
/// Within a view every clustering key has the same shape, so the derived ordering sorts
/// rows the way the store clusters them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusteringValue {
    Time(DateTime<Utc>),
    Id(VesselId),
}

/// Full key of a row: view, partition key and clustering key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub view: ViewName,
    pub partition_key: String,
    pub clustering_key: Vec<ClusteringValue>,
}

impl RowKey {
    pub fn new(
        view: ViewName,
        partition_key: impl Into<String>,
        clustering_key: Vec<ClusteringValue>,
    ) -> Self {
        Self {
            view,
            partition_key: partition_key.into(),
            clustering_key,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.view, self.partition_key)?;
        for value in &self.clustering_key {
            match value {
                ClusteringValue::Time(time) => write!(f, "/{}", time.to_rfc3339())?,
                ClusteringValue::Id(id) => write!(f, "/{}", id)?,
            }
        }
        Ok(())
    }
}

/// Denormalized columns a view stores next to the canonical payload.
///
/// Only the by-scope view fills them; they back the name and category filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowColumns {
    pub name: Option<String>,
    pub category: Option<CategoryReference>,
}

/// A stored row: its key, the canonical vessel it projects, and its denormalized columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub key: RowKey,
    pub vessel: Vessel,
    pub columns: RowColumns,
}

impl ViewRow {
    pub fn into_vessel(self) -> Vessel {
        self.vessel
    }
}

/// A single operation inside a batch submitted to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Insert the row, or overwrite the row with the same key.
    Upsert(ViewRow),
    /// Remove the row with this key. Removing an absent row is not an error.
    Delete(RowKey),
}

impl BatchOperation {
    pub fn key(&self) -> &RowKey {
        match self {
            Self::Upsert(row) => &row.key,
            Self::Delete(key) => key,
        }
    }
}

/// Range predicate on the first clustering component of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringRange {
    /// Rows whose leading time component is strictly after the instant.
    After(DateTime<Utc>),
}

impl ClusteringRange {
    pub fn contains(&self, clustering_key: &[ClusteringValue]) -> bool {
        match (self, clustering_key.first()) {
            (Self::After(since), Some(ClusteringValue::Time(time))) => time > since,
            _ => false,
        }
    }
}

/// Predicate on the denormalized columns of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnFilter {
    /// Case-insensitive substring match on the name column.
    NameContains(String),
    /// Exact match on the category column.
    CategoryEquals(CategoryReference),
}

impl ColumnFilter {
    pub fn matches(&self, columns: &RowColumns) -> bool {
        match self {
            Self::NameContains(fragment) => columns
                .name
                .as_ref()
                .is_some_and(|name| name.to_lowercase().contains(&fragment.to_lowercase())),
            Self::CategoryEquals(category) => columns.category.as_ref() == Some(category),
        }
    }
}

/// Read of one partition of a view, optionally narrowed by range and column predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub view: ViewName,
    pub partition_key: String,
    pub range: Option<ClusteringRange>,
    pub filter: Option<ColumnFilter>,
}

impl ScanRequest {
    /// Scan a whole partition.
    pub fn partition(view: ViewName, partition_key: impl Into<String>) -> Self {
        Self {
            view,
            partition_key: partition_key.into(),
            range: None,
            filter: None,
        }
    }

    pub fn with_range(mut self, range: ClusteringRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Check that the view can serve the request's predicates.
    ///
    /// The by-identifier view takes none, the by-scope view takes a column filter and the
    /// by-departure view takes a clustering range. Every store rejects the rest with
    /// `InvalidArgument`.
    pub fn check_supported(&self) -> Result<(), VesselRepositoryError> {
        let supported = match self.view {
            ViewName::ById => self.range.is_none() && self.filter.is_none(),
            ViewName::ByScope => self.range.is_none(),
            ViewName::ByDeparture => self.filter.is_none(),
        };
        if supported {
            Ok(())
        } else {
            Err(VesselRepositoryError::invalid_argument(format!(
                "unsupported scan predicate on {}: {:?} / {:?}",
                self.view, self.range, self.filter
            )))
        }
    }

    /// Whether a row of the scanned partition satisfies the range and filter.
    pub fn accepts(&self, row: &ViewRow) -> bool {
        let in_range = match self.range {
            Some(range) => range.contains(&row.key.clustering_key),
            None => true,
        };
        let matches = match &self.filter {
            Some(filter) => filter.matches(&row.columns),
            None => true,
        };
        in_range && matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let columns = RowColumns {
            name: Some("Global ENT".to_string()),
            category: None,
        };

        assert!(ColumnFilter::NameContains("ent".to_string()).matches(&columns));
        assert!(ColumnFilter::NameContains("ENT".to_string()).matches(&columns));
        assert!(!ColumnFilter::NameContains("Local".to_string()).matches(&columns));
    }

    #[test]
    fn test_category_filter_is_exact() {
        let columns = RowColumns {
            name: None,
            category: Some(CategoryReference::new("cargo")),
        };

        assert!(ColumnFilter::CategoryEquals(CategoryReference::new("cargo")).matches(&columns));
        assert!(!ColumnFilter::CategoryEquals(CategoryReference::new("Cargo")).matches(&columns));
    }

    #[test]
    fn test_after_range_is_strict() {
        let now = Utc::now();
        let range = ClusteringRange::After(now);

        assert!(range.contains(&[ClusteringValue::Time(now + Duration::seconds(1))]));
        assert!(!range.contains(&[ClusteringValue::Time(now)]));
        assert!(!range.contains(&[ClusteringValue::Id(VesselId::generate())]));
    }

    #[test]
    fn test_check_supported_predicates() {
        let since = Utc::now();
        let filter = ColumnFilter::NameContains("ENT".to_string());

        assert!(ScanRequest::partition(ViewName::ById, "x").check_supported().is_ok());
        assert!(ScanRequest::partition(ViewName::ByScope, "S")
            .with_filter(filter.clone())
            .check_supported()
            .is_ok());
        assert!(ScanRequest::partition(ViewName::ByDeparture, "brest")
            .with_range(ClusteringRange::After(since))
            .check_supported()
            .is_ok());

        for request in [
            ScanRequest::partition(ViewName::ById, "x").with_filter(filter.clone()),
            ScanRequest::partition(ViewName::ByScope, "S").with_range(ClusteringRange::After(since)),
            ScanRequest::partition(ViewName::ByDeparture, "brest").with_filter(filter.clone()),
        ] {
            assert!(matches!(
                request.check_supported(),
                Err(VesselRepositoryError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_row_key_display() {
        let id = VesselId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let key = RowKey::new(ViewName::ByScope, "_ALL", vec![ClusteringValue::Id(id)]);

        assert_eq!(
            key.to_string(),
            "vessels[_ALL]/550e8400-e29b-41d4-a716-446655440000"
        );
    }
}
