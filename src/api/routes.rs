//! API route configuration.

use crate::api::handlers::{fallback_handler, health_handler, root_handler};
use axum::{Router, routing::get};

/// Public application routes, before any middleware is attached.
///
/// # Endpoints
///
/// - `GET /`        - Service banner
/// - `GET /health`  - Liveness check
///
/// Unmatched paths return a structured `404`.
pub fn public_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
}
