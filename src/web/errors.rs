use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::AuthError;
use crate::error::Error;

/// Application error type for web handlers. Rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(AuthError),
    NotFound(String),
    Validation(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Unauthorized(e) => e.to_string(),
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    pub fn not_found(kind: &str) -> Self {
        AppError::NotFound(format!("{} not found", capitalize(kind)))
    }

    pub fn invalid_id(kind: &str) -> Self {
        AppError::BadRequest(format!("Invalid {kind} ID format"))
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e)
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidId { kind, .. } => AppError::invalid_id(kind),
            Error::NotFound { kind, .. } => AppError::not_found(kind),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            tracing::error!(status = %status, detail = %detail, "request failed");
        } else {
            tracing::debug!(status = %status, detail = %detail, "request rejected");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
