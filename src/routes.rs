//! Top-level router configuration and the security middleware stack.
//!
//! # Request Pipeline
//!
//! Outermost first:
//!
//! 1. **Tracing** - Structured request/response logging
//! 2. **Security headers** - Starts the response timer; writes the fixed header
//!    set on the way out
//! 3. **CORS** - Origin allow-list, preflight handling
//! 4. **Trusted host** - Rejects unknown `Host` values with `400`
//! 5. **Compression** - Gzip for bodies of at least `compression_min_size`
//! 6. **Rate limiting** - Per-client token bucket, structured `429`; idle
//!    client entries are pruned every `SHRINK_INTERVAL` requests
//! 7. **Route handler**
//!
//! Axum runs the most recently added `.layer` first, so [`configure_app`]
//! attaches them in reverse (rate limiting first, header injection last).

use crate::api;
use crate::api::middleware::{compression, cors, rate_limit, security_headers, tracing, trusted_host};
use crate::config::SecurityConfig;
use crate::error::SetupError;
use crate::policy::{ContentSecurityPolicy, SecurityHeaders, TrustedHosts};
use axum::{Router, middleware};
use std::sync::Arc;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};

/// Attaches the security and performance middleware to `router`.
///
/// Call once at startup, after all routes are registered. Every response
/// leaving the returned router carries the fixed security header set,
/// including responses produced by the other layers (host rejections,
/// rate-limit errors, CORS preflights).
///
/// Rate limiting keys on the peer socket address, so the router must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()` unless
/// `behind_proxy` is set and the proxy always forwards the client address.
///
/// # Errors
///
/// Fails fast on misconfiguration:
/// - malformed or empty trusted host list
/// - invalid CORS origin or method
/// - zero rate-limit period or burst
pub fn configure_app(router: Router, settings: &SecurityConfig) -> Result<Router, SetupError> {
    let trusted_hosts = Arc::new(TrustedHosts::parse(
        &settings.allowed_hosts,
        settings.www_redirect,
    )?);
    let headers = Arc::new(SecurityHeaders::new(&ContentSecurityPolicy::standard())?);
    let cors = cors::layer(settings)?;

    let router = if settings.behind_proxy {
        let (limiter, pruner) = rate_limit::layer(SmartIpKeyExtractor, settings)?;
        router.layer(limiter).layer(middleware::from_fn_with_state(
            pruner,
            rate_limit::prune_idle_clients,
        ))
    } else {
        let (limiter, pruner) = rate_limit::layer(PeerIpKeyExtractor, settings)?;
        router.layer(limiter).layer(middleware::from_fn_with_state(
            pruner,
            rate_limit::prune_idle_clients,
        ))
    };

    let router = router
        .layer(compression::layer(settings.compression_min_size))
        .layer(middleware::from_fn_with_state(
            trusted_hosts,
            trusted_host::layer,
        ))
        .layer(cors)
        .layer(middleware::from_fn_with_state(
            headers,
            security_headers::layer,
        ));

    Ok(router)
}

/// Constructs the application router with all routes and middleware.
///
/// # Errors
///
/// See [`configure_app`].
pub fn app_router(settings: &SecurityConfig) -> Result<Router, SetupError> {
    let router = configure_app(api::routes::public_routes(), settings)?;

    Ok(router.layer(tracing::layer()))
}
