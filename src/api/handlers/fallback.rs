use axum::http::Uri;
use serde_json::json;

use crate::error::AppError;

/// Structured 404 for unmatched routes.
pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}
