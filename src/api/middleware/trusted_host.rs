//! Host header validation middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::error::AppError;
use crate::policy::TrustedHosts;
use crate::policy::host::strip_port;

/// Rejects requests whose `Host` does not match the allow-list.
///
/// # Host Resolution
///
/// 1. `Host` header
/// 2. Request URI authority (HTTP/2 `:authority`)
///
/// The port is ignored when matching.
///
/// # Errors
///
/// Returns `400 Bad Request` with code `invalid_host` when the host is
/// missing or not allowed. Route handlers never run for such requests.
///
/// # Redirects
///
/// When `www_redirect` is enabled and `www.<host>` is an allowed exact
/// host, responds with `307 Temporary Redirect` to the same URL on
/// `www.<host>` instead of rejecting.
pub async fn layer(
    State(hosts): State<Arc<TrustedHosts>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if hosts.allows_any() {
        return Ok(next.run(req).await);
    }

    let raw_host = request_host(&req).unwrap_or_default();
    let host = strip_port(&raw_host);

    if hosts.is_allowed(host) {
        return Ok(next.run(req).await);
    }

    if hosts.should_redirect_to_www(host) {
        let scheme = req.uri().scheme_str().unwrap_or("http");
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let location = format!("{scheme}://www.{raw_host}{path_and_query}");

        tracing::debug!(host = %host, location = %location, "Redirecting to www host");
        return Ok(Redirect::temporary(&location).into_response());
    }

    metrics::counter!("http_requests_rejected_total", "reason" => "untrusted_host").increment(1);
    tracing::warn!(host = %raw_host, "Rejected request with untrusted host");

    Err(AppError::invalid_host(
        "Invalid host header",
        json!({ "host": raw_host }),
    ))
}

fn request_host(req: &Request) -> Option<String> {
    match req.headers().get(header::HOST) {
        Some(value) => value.to_str().ok().map(str::to_string),
        None => req.uri().authority().map(|a| a.host().to_string()),
    }
}
