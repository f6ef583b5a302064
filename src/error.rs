//! Error types.
//!
//! - [`AppError`] - request-time failures rendered as structured JSON responses
//! - [`SetupError`] - startup misconfiguration; the server refuses to start

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    InvalidHost {
        message: String,
        details: Value,
    },
    TooManyRequests {
        message: String,
        details: Value,
        headers: HeaderMap,
    },
    NotFound {
        message: String,
        details: Value,
    },
    Internal {
        message: String,
        details: Value,
    },
    /// Pass-through for errors whose status is decided by a collaborator.
    Other {
        status: StatusCode,
        message: String,
        details: Value,
    },
}

impl AppError {
    pub fn invalid_host(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidHost {
            message: message.into(),
            details,
        }
    }
    pub fn too_many_requests(message: impl Into<String>, details: Value, headers: HeaderMap) -> Self {
        Self::TooManyRequests {
            message: message.into(),
            details,
            headers,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
    pub fn other(status: StatusCode, message: impl Into<String>, details: Value) -> Self {
        Self::Other {
            status,
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut extra_headers = HeaderMap::new();

        let (status, code, message, details) = match self {
            AppError::InvalidHost { message, details } => {
                (StatusCode::BAD_REQUEST, "invalid_host", message, details)
            }
            AppError::TooManyRequests {
                message,
                details,
                headers,
            } => {
                extra_headers = headers;
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limit_exceeded",
                    message,
                    details,
                )
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
            AppError::Other {
                status,
                message,
                details,
            } => (status, "request_rejected", message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, extra_headers, Json(body)).into_response()
    }
}

/// Misconfiguration detected while assembling the middleware stack.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid trusted host pattern '{pattern}': {reason}")]
    InvalidHostPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("trusted host list must not be empty")]
    EmptyHostList,

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("rate limit period and burst size must be greater than zero")]
    InvalidRateLimit,

    #[error("invalid security header value: {0}")]
    InvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),
}
