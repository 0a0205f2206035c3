//! API route definitions.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use advoga_shared::AppError;

pub mod billing;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes() -> axum::Router {
    axum::Router::new()
        .merge(health::routes())
        .merge(billing::routes())
}

/// Renders the standard error envelope for an application error.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": {
                "code": err.error_code(),
                "message": err.to_string(),
            }
        })),
    )
        .into_response()
}

/// Fallback handler for unknown routes.
pub async fn not_found() -> Response {
    error_response(&AppError::NotFound("route".to_string()))
}
