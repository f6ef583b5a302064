//! Handler for health check endpoint.

use axum::Json;

use crate::api::dto::health::HealthResponse;

/// Reports that the service is up.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "framework": "wss13",
///   "version": "1.0.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        framework: "wss13".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
