//! HTTP handlers. Each one validates its input and calls a single `VesselService` operation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use vessel_registry_repository::parse_vessel_id;
use vessel_registry_shared::{CategoryReference, PortReference, ScopeReference, Vessel};

use crate::api::dto::{VesselCreated, VesselListQuery, VesselRemoved, VesselRequest};
use crate::api::error::ApiError;
use crate::api::AppState;

pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Vessel registry is running")
}

pub async fn create_vessel(
    State(state): State<AppState>,
    Json(request): Json<VesselRequest>,
) -> Result<(StatusCode, Json<VesselCreated>), ApiError> {
    let vessel = request.into_vessel(None)?;
    let id = state.service.add(vessel).await?;

    info!(vessel_id = %id, "Vessel created");
    Ok((StatusCode::CREATED, Json(VesselCreated { id })))
}

pub async fn get_vessel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vessel>, ApiError> {
    state
        .service
        .find(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No vessel with ID {}", id)))
}

/// Replace the vessel stored under the path identifier, creating it if absent.
///
/// The identifier in the path wins over any identifier in the body.
pub async fn update_vessel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<VesselRequest>,
) -> Result<Json<Vessel>, ApiError> {
    let id = parse_vessel_id(&id)?;
    let vessel = request.into_vessel(Some(id))?;
    state.service.update(vessel.clone()).await?;

    Ok(Json(vessel))
}

pub async fn delete_vessel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VesselRemoved>, ApiError> {
    let removed = state.service.remove(&id).await?;
    Ok(Json(VesselRemoved { removed }))
}

/// List the vessels visible to a scope, optionally filtered by name fragment or category.
pub async fn list_scope_vessels(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    Query(query): Query<VesselListQuery>,
) -> Result<Json<Vec<Vessel>>, ApiError> {
    let scope = ScopeReference::new(scope);

    let vessels = match (query.name, query.category) {
        (Some(_), Some(_)) => {
            return Err(ApiError::bad_request(
                "name and category filters cannot be combined",
            ))
        }
        (Some(fragment), None) => {
            state
                .service
                .find_by_name_fragment(&scope, &fragment)
                .await?
        }
        (None, Some(category)) => {
            state
                .service
                .find_by_category(&scope, &CategoryReference::new(category))
                .await?
        }
        (None, None) => state.service.find_all(&scope).await?,
    };

    Ok(Json(vessels))
}

pub async fn list_recent_departures(
    State(state): State<AppState>,
    Path(port): Path<String>,
) -> Result<Json<Vec<Vessel>>, ApiError> {
    let vessels = state
        .service
        .find_by_departure_port(&PortReference::new(port))
        .await?;
    Ok(Json(vessels))
}
