//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub framework: String,
    pub version: String,
}
