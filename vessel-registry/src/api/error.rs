//! Mapping of service errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;
use vessel_registry_repository::VesselRepositoryError;
use vessel_registry_shared::VesselValidationError;

/// Errors returned by the HTTP handlers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request carried an invalid vessel or a malformed key.
    #[error("{0}")]
    BadRequest(String),

    /// The requested vessel does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The record store failed.
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<VesselRepositoryError> for ApiError {
    fn from(err: VesselRepositoryError) -> Self {
        match err {
            VesselRepositoryError::ValidationError(_) | VesselRepositoryError::InvalidArgument(_) => {
                Self::BadRequest(err.to_string())
            }
            VesselRepositoryError::StorageError(_) => {
                error!(error = %err, "Record store failure");
                Self::Unavailable(err.to_string())
            }
        }
    }
}

impl From<VesselValidationError> for ApiError {
    fn from(err: VesselValidationError) -> Self {
        Self::BadRequest(VesselRepositoryError::from(err).to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
