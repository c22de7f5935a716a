//! # Error Handling
//!
//! Error taxonomy for the dashboard:
//!
//! - not-found: the requested sandbox (or user record) does not exist
//! - unauthorized: no usable identity header on the request
//! - validation: malformed form input, reported per field
//! - everything else: Kubernetes API failures propagated as-is
//!
//! No operation is retried; an API failure fails the request it occurred in.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("identity header missing or unusable")]
    Unauthorized,

    #[error("form validation failed")]
    Validation(Vec<FieldError>),

    #[error("kubernetes api error: {0}")]
    Kube(#[from] kube::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single form field validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Returns true when a Kubernetes API error is a 404.
///
/// Used to distinguish "create the record" (identity lookup) and
/// "report not-found" (detail, delete) from other API failures.
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, fields) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, Vec::new()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, Vec::new()),
            Self::Validation(fields) => (StatusCode::UNPROCESSABLE_ENTITY, fields.clone()),
            Self::Kube(_) | Self::Serialize(_) => {
                error!("request failed: {self}");
                (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = DashboardError::NotFound("sandbox sb-alice-abcde".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = DashboardError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_maps_to_422() {
        let response =
            DashboardError::Validation(vec![FieldError::new("bogus", "unknown field")])
                .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
