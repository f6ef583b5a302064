//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::{Request, header};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

pub type RequestTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, fn(&Request<Body>) -> Span>;

/// Creates a tracing middleware for HTTP requests.
///
/// Attached outside every security layer, so rejected requests (untrusted
/// host, rate limited, CORS preflight) are logged too. The span records the
/// raw `Host` header to make trusted-host rejections traceable.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET uri=/health host=localhost}: finished processing request latency=0 ms status=200
/// INFO request{method=GET uri=/ host=evil.example}: finished processing request latency=1 ms status=400
/// ```
pub fn layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(request_span as fn(&Request<Body>) -> Span)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn request_span(req: &Request<Body>) -> Span {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        host = %host,
    )
}
