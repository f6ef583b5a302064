//! Security header injection middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::policy::SecurityHeaders;

/// Times the request and writes the fixed header set onto the response.
///
/// # Headers
///
/// - `Strict-Transport-Security`, `X-Content-Type-Options`, `X-Frame-Options`,
///   `X-XSS-Protection`, `Referrer-Policy`, `Permissions-Policy`,
///   `Content-Security-Policy`, `X-Powered-By`
/// - `X-Response-Time` - elapsed time, e.g. `3.14ms`
/// - `Cache-Control` - `public, max-age=3600` for `GET`, `no-cache` otherwise
///
/// Values always replace anything set further down the stack, including by
/// handlers. Responses produced by inner middleware (host rejections,
/// rate-limit errors, CORS preflights) are enriched the same way.
///
/// # Example
///
/// ```rust,ignore
/// let headers = Arc::new(SecurityHeaders::new(&ContentSecurityPolicy::standard())?);
/// let app = Router::new()
///     .route("/", get(root_handler))
///     .layer(middleware::from_fn_with_state(headers, security_headers::layer));
/// ```
pub async fn layer(
    State(headers): State<Arc<SecurityHeaders>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();

    let mut response = next.run(req).await;

    headers.apply(response.headers_mut(), &method, start.elapsed());

    response
}
