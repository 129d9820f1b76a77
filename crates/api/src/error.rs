//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use potledger_shared::AppError;

/// Renders an error as `{ "error": <code>, "message": <text> }`.
///
/// Server-side failures are logged and their details withheld from the body.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_client_error() {
        err.to_string()
    } else {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}
