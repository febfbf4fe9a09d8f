//! Request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vessel_registry_shared::{Vessel, VesselId, VesselValidationError, Visibility};

/// Body of `POST /vessels` and `PUT /vessels/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct VesselRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    pub creation_scope: Option<String>,
    #[serde(default)]
    pub last_departure: Option<DepartureRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartureRequest {
    pub port: String,
    pub time: DateTime<Utc>,
}

impl VesselRequest {
    /// Build the vessel described by the request, under `id` when given.
    pub fn into_vessel(self, id: Option<VesselId>) -> Result<Vessel, VesselValidationError> {
        let mut builder = Vessel::builder();
        if let Some(id) = id {
            builder = builder.with_id(id);
        }
        if let Some(name) = self.name {
            builder = builder.with_name(name);
        }
        if let Some(category) = self.category {
            builder = builder.with_category(category.as_str());
        }
        if let Some(visibility) = self.visibility {
            builder = builder.with_visibility(visibility);
        }
        if let Some(scope) = self.creation_scope {
            builder = builder.with_creation_scope(scope.as_str());
        }
        if let Some(departure) = self.last_departure {
            builder = builder.with_departure(departure.port.as_str(), departure.time);
        }
        builder.build()
    }
}

/// Response of `POST /vessels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VesselCreated {
    pub id: VesselId,
}

/// Response of `DELETE /vessels/:id`. `removed` is `None` when nothing was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VesselRemoved {
    pub removed: Option<Vessel>,
}

/// Query string of `GET /scopes/:scope/vessels`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VesselListQuery {
    pub name: Option<String>,
    pub category: Option<String>,
}
