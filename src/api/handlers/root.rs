//! Service banner.

use axum::Json;

use crate::api::dto::root::RootResponse;

/// `GET /`
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "WSS13 Framework - Seguro e Otimizado".to_string(),
    })
}
