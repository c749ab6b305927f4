//! Error → HTTP response mapping.
//!
//! Every error body has the shape `{"error": <code>, "message": <detail>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use stockdesk_core::DomainError;
use stockdesk_infra::StoreError;

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "error": code, "message": message.into() })),
    )
        .into_response()
}

pub fn not_found(message: impl Into<String>) -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn forbidden(message: impl Into<String>) -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Domain failures are deterministic and map to client errors.
pub fn domain_error(err: DomainError) -> Response {
    match err {
        DomainError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        DomainError::InvalidId(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
        }
        DomainError::InvalidOperation(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_operation", err.to_string())
        }
        DomainError::NotFound => not_found("resource not found"),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
        DomainError::Unauthorized => forbidden("unauthorized"),
    }
}

/// Store failures: uniqueness conflicts surface as 409, anything else is an
/// opaque 500 (the detail goes to the log, not the client).
pub fn store_error(err: StoreError) -> Response {
    match err {
        StoreError::Duplicate(_) => json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
        StoreError::Backend(detail) => {
            tracing::error!(error = %detail, "storage backend failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "storage backend failure",
            )
        }
    }
}
