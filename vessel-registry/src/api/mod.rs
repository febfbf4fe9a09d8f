//! HTTP surface of the vessel registry.
//!
//! | Route                           | Operation                  |
//! |---------------------------------|----------------------------|
//! | `GET /health`                   | liveness                   |
//! | `POST /vessels`                 | add                        |
//! | `GET /vessels/:id`              | find by identifier         |
//! | `PUT /vessels/:id`              | update (upsert)            |
//! | `DELETE /vessels/:id`           | remove                     |
//! | `GET /scopes/:scope/vessels`    | find all / by name / by category (`?name=` or `?category=`) |
//! | `GET /ports/:port/departures`   | recent departures          |

pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use vessel_registry_repository::VesselService;

pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VesselService>,
}

impl AppState {
    pub fn new(service: Arc<VesselService>) -> Self {
        Self { service }
    }
}

/// Build the router serving every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/vessels", axum::routing::post(handlers::create_vessel))
        .route(
            "/vessels/:id",
            get(handlers::get_vessel)
                .put(handlers::update_vessel)
                .delete(handlers::delete_vessel),
        )
        .route("/scopes/:scope/vessels", get(handlers::list_scope_vessels))
        .route(
            "/ports/:port/departures",
            get(handlers::list_recent_departures),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
