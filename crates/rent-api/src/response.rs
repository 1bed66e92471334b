//! API Response wrapper

use axum::{http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use rent_core::FieldErrors;

/// Envelope shared by every endpoint, success or failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: &str, message: &str, fields: Option<FieldErrors>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                fields,
            }),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<Message> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::success(Message { message: message.into() })
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, crate::error::ApiError>;

/// `201 Created` with the envelope.
pub type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), crate::error::ApiError>;

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}
