//! HTTP error mapping

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use rent_core::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Malformed path, query or body.
    #[error("Bad request: {message}")]
    BadRequest { status: StatusCode, message: String },

    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    /// Status, stable error code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::ValidationFailed(_) | DomainError::InvalidSlug(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    "The given data was invalid.".to_string(),
                ),
                DomainError::Conflict { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CONFLICT",
                    "The given data was invalid.".to_string(),
                ),
                DomainError::NotFound { resource, .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{} not found.", resource))
                }
                DomainError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Unauthenticated.".to_string())
                }
                DomainError::Forbidden(message) => (StatusCode::FORBIDDEN, "FORBIDDEN", message.clone()),
                DomainError::TenantRejected(rejection) => {
                    (StatusCode::FORBIDDEN, rejection.code(), rejection.to_string())
                }
                DomainError::ProvisioningIncomplete { tenant_id, .. } => (
                    StatusCode::BAD_GATEWAY,
                    "PROVISIONING_INCOMPLETE",
                    format!(
                        "The store for tenant {} is not provisioned. Retry with POST /v1/tenants/{}/provision.",
                        tenant_id, tenant_id
                    ),
                ),
                DomainError::TenantContextActive
                | DomainError::NoTenantContext
                | DomainError::PasswordHashError(_)
                | DomainError::DatabaseError(_)
                | DomainError::InternalError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error.".to_string(),
                ),
            },
            ApiError::BadRequest { status, message } => (*status, "BAD_REQUEST", message.clone()),
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found.".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!("{} {}: {}", status.as_u16(), code, self);
        } else {
            warn!("{} {}: {}", status.as_u16(), code, self);
        }

        let fields = match &self {
            ApiError::Domain(err) => err.field_errors(),
            _ => None,
        };
        let body = Json(ApiResponse::<()>::error(code, &message, fields));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest { status: StatusCode::BAD_REQUEST, message: rejection.body_text() }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest { status: StatusCode::BAD_REQUEST, message: rejection.body_text() }
    }
}
