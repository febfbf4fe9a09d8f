//! View registry.
//!
//! Each view is a small descriptor holding a key derivation function and a relevance
//! predicate. The write path, the delete path and the stale-row cleanup all derive keys
//! through these descriptors, so a row is always deleted under the key it was written with.

use std::fmt;

use vessel_registry_shared::{Vessel, VesselId};

use crate::types::{ClusteringValue, RowColumns, RowKey, ViewName, ViewRow};
use crate::views::partitioning::partition_key_for;

/// Static description of one denormalized view.
pub struct ViewDescriptor {
    name: ViewName,
    derive_key: fn(VesselId, &Vessel) -> Option<RowKey>,
    derive_columns: fn(&Vessel) -> RowColumns,
    is_relevant: fn(&Vessel) -> bool,
}

impl ViewDescriptor {
    pub fn name(&self) -> ViewName {
        self.name
    }

    /// Whether the vessel must have a row in this view.
    pub fn is_relevant(&self, vessel: &Vessel) -> bool {
        (self.is_relevant)(vessel)
    }

    /// Key of the vessel's row in this view, `None` if the vessel has no row here.
    pub fn row_key(&self, id: VesselId, vessel: &Vessel) -> Option<RowKey> {
        if !self.is_relevant(vessel) {
            return None;
        }
        (self.derive_key)(id, vessel)
    }

    /// The vessel's row in this view, `None` if the vessel has no row here.
    ///
    /// The stored payload always carries `id`, whatever identifier `vessel` holds.
    pub fn row(&self, id: VesselId, vessel: &Vessel) -> Option<ViewRow> {
        let key = self.row_key(id, vessel)?;
        Some(ViewRow {
            key,
            vessel: vessel.clone().with_id(id),
            columns: (self.derive_columns)(vessel),
        })
    }
}

impl fmt::Debug for ViewDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Every view, in the order batches are built.
pub static VIEW_REGISTRY: [ViewDescriptor; 3] = [
    ViewDescriptor {
        name: ViewName::ById,
        derive_key: by_id_key,
        derive_columns: no_columns,
        is_relevant: always_relevant,
    },
    ViewDescriptor {
        name: ViewName::ByScope,
        derive_key: by_scope_key,
        derive_columns: by_scope_columns,
        is_relevant: always_relevant,
    },
    ViewDescriptor {
        name: ViewName::ByDeparture,
        derive_key: by_departure_key,
        derive_columns: no_columns,
        is_relevant: has_departure,
    },
];

/// Get the views the vessel must appear in, in registry order.
pub fn relevant_views(vessel: &Vessel) -> Vec<&'static ViewDescriptor> {
    VIEW_REGISTRY
        .iter()
        .filter(|descriptor| descriptor.is_relevant(vessel))
        .collect()
}

/// Get the keys of every row the vessel has under `id`, in registry order.
pub fn row_keys_for(id: VesselId, vessel: &Vessel) -> Vec<RowKey> {
    relevant_views(vessel)
        .into_iter()
        .filter_map(|descriptor| descriptor.row_key(id, vessel))
        .collect()
}

/// Get every row the vessel has under `id`, in registry order.
pub fn rows_for(id: VesselId, vessel: &Vessel) -> Vec<ViewRow> {
    relevant_views(vessel)
        .into_iter()
        .filter_map(|descriptor| descriptor.row(id, vessel))
        .collect()
}

/// Key of a vessel's row in the by-identifier view.
pub fn identifier_key(id: VesselId) -> RowKey {
    RowKey::new(ViewName::ById, id.to_string(), Vec::new())
}

fn always_relevant(_vessel: &Vessel) -> bool {
    true
}

fn has_departure(vessel: &Vessel) -> bool {
    vessel.last_departure().is_some()
}

fn no_columns(_vessel: &Vessel) -> RowColumns {
    RowColumns::default()
}

fn by_id_key(id: VesselId, _vessel: &Vessel) -> Option<RowKey> {
    Some(identifier_key(id))
}

fn by_scope_key(id: VesselId, vessel: &Vessel) -> Option<RowKey> {
    Some(RowKey::new(
        ViewName::ByScope,
        partition_key_for(vessel.visibility(), vessel.creation_scope()),
        vec![ClusteringValue::Id(id)],
    ))
}

fn by_scope_columns(vessel: &Vessel) -> RowColumns {
    RowColumns {
        name: Some(vessel.name().to_string()),
        category: Some(vessel.category().clone()),
    }
}

fn by_departure_key(id: VesselId, vessel: &Vessel) -> Option<RowKey> {
    let departure = vessel.last_departure()?;
    Some(RowKey::new(
        ViewName::ByDeparture,
        departure.port().as_str(),
        vec![
            ClusteringValue::Time(departure.time()),
            ClusteringValue::Id(id),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vessel_registry_shared::{CategoryReference, Visibility};

    fn vessel(visibility: Visibility) -> Vessel {
        Vessel::builder()
            .with_name("Le_Name")
            .with_category("Cargo")
            .with_visibility(visibility)
            .with_creation_scope("Le_center")
            .build()
            .unwrap()
    }

    #[test]
    fn test_registry_order_is_stable() {
        let names: Vec<ViewName> = VIEW_REGISTRY.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![ViewName::ById, ViewName::ByScope, ViewName::ByDeparture]
        );
    }

    #[test]
    fn test_departure_view_requires_departure() {
        let without = vessel(Visibility::Scoped);
        let with = without
            .to_builder()
            .with_departure("brest", Utc::now())
            .build()
            .unwrap();

        let names = |v: &Vessel| -> Vec<ViewName> {
            relevant_views(v).iter().map(|d| d.name()).collect()
        };

        assert_eq!(names(&without), vec![ViewName::ById, ViewName::ByScope]);
        assert_eq!(
            names(&with),
            vec![ViewName::ById, ViewName::ByScope, ViewName::ByDeparture]
        );
    }

    #[test]
    fn test_by_scope_key_follows_visibility() {
        let id = VesselId::generate();
        let scope_view = &VIEW_REGISTRY[1];

        let global = scope_view.row_key(id, &vessel(Visibility::Global)).unwrap();
        let scoped = scope_view.row_key(id, &vessel(Visibility::Scoped)).unwrap();

        assert_eq!(global.partition_key, "_ALL");
        assert_eq!(scoped.partition_key, "Le_center");
        assert_eq!(scoped.clustering_key, vec![ClusteringValue::Id(id)]);
    }

    #[test]
    fn test_by_scope_row_carries_denormalized_columns() {
        let id = VesselId::generate();
        let row = VIEW_REGISTRY[1].row(id, &vessel(Visibility::Global)).unwrap();

        assert_eq!(row.columns.name.as_deref(), Some("Le_Name"));
        assert_eq!(row.columns.category, Some(CategoryReference::new("Cargo")));
        assert_eq!(row.vessel.id(), Some(id));
    }

    #[test]
    fn test_by_departure_key() {
        let id = VesselId::generate();
        let time = Utc::now();
        let v = vessel(Visibility::Scoped)
            .to_builder()
            .with_departure("brest", time)
            .build()
            .unwrap();
        let departure_time = v.last_departure().unwrap().time();

        let key = VIEW_REGISTRY[2].row_key(id, &v).unwrap();

        assert_eq!(key.partition_key, "brest");
        assert_eq!(
            key.clustering_key,
            vec![
                ClusteringValue::Time(departure_time),
                ClusteringValue::Id(id)
            ]
        );
    }

    #[test]
    fn test_irrelevant_view_has_no_row() {
        let id = VesselId::generate();
        assert!(VIEW_REGISTRY[2].row(id, &vessel(Visibility::Global)).is_none());
    }

    #[test]
    fn test_row_keys_for_matches_rows_for() {
        let id = VesselId::generate();
        let v = vessel(Visibility::Global)
            .to_builder()
            .with_departure("brest", Utc::now())
            .build()
            .unwrap();

        let keys = row_keys_for(id, &v);
        let row_keys: Vec<RowKey> = rows_for(id, &v).into_iter().map(|r| r.key).collect();

        assert_eq!(keys.len(), 3);
        assert_eq!(keys, row_keys);
        assert_eq!(keys[0], identifier_key(id));
    }
}
