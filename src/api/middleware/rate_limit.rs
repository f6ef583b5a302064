//! Rate limiting middleware using token bucket algorithm.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use serde_json::json;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::{GovernorConfigBuilder, SharedRateLimiter},
    key_extractor::KeyExtractor,
};

use crate::config::SecurityConfig;
use crate::error::{AppError, SetupError};

pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, Body>;

/// Keyed limiter store shared by the governor layer and [`IdleClientPruner`].
pub type ClientLimiter = SharedRateLimiter<IpAddr, NoOpMiddleware<QuantaInstant>>;

/// Requests between two sweeps of the limiter store.
pub const SHRINK_INTERVAL: u64 = 1024;

/// Creates a per-client rate limiter.
///
/// # Limits
///
/// - **Burst**: `rate_limit_burst` requests
/// - **Replenish**: one request every `rate_limit_period_seconds`
///
/// Requests exceeding the limit receive a structured `429 Too Many Requests`
/// (see [`rate_limit_error`]).
///
/// # Key Extraction
///
/// Pass `PeerIpKeyExtractor` to key on the socket peer address, or
/// `SmartIpKeyExtractor` to prefer `X-Forwarded-For` / `X-Real-IP` /
/// `Forwarded` when running behind a trusted reverse proxy.
///
/// # Errors
///
/// Returns [`SetupError::InvalidRateLimit`] if the period or burst is zero.
///
/// # Memory
///
/// The limiter keeps one entry per client key. The returned
/// [`IdleClientPruner`] drops entries that have fully replenished; attach
/// it with [`prune_idle_clients`] or nothing is ever evicted.
///
/// # Example
///
/// ```rust,ignore
/// let (limiter, pruner) = rate_limit::layer(PeerIpKeyExtractor, &settings)?;
/// let app = Router::new()
///     .route("/", get(root_handler))
///     .layer(limiter)
///     .layer(middleware::from_fn_with_state(pruner, rate_limit::prune_idle_clients));
/// ```
pub fn layer<K>(
    key_extractor: K,
    settings: &SecurityConfig,
) -> Result<(RateLimitLayer<K>, IdleClientPruner), SetupError>
where
    K: KeyExtractor<Key = IpAddr>,
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(settings.rate_limit_period_seconds)
            .burst_size(settings.rate_limit_burst)
            .key_extractor(key_extractor)
            .finish()
            .ok_or(SetupError::InvalidRateLimit)?,
    );

    let pruner = IdleClientPruner::new(governor_conf.limiter().clone(), SHRINK_INTERVAL);
    let layer = GovernorLayer::new(governor_conf).error_handler(rate_limit_error);

    Ok((layer, pruner))
}

/// Periodically evicts clients whose bucket is full again.
///
/// An evicted client is indistinguishable from a new one, so pruning never
/// changes a rate-limit decision.
#[derive(Clone)]
pub struct IdleClientPruner {
    limiter: ClientLimiter,
    interval: u64,
    requests: Arc<AtomicU64>,
}

impl IdleClientPruner {
    /// Sweeps the store once every `interval` recorded requests.
    pub fn new(limiter: ClientLimiter, interval: u64) -> Self {
        Self {
            limiter,
            interval: interval.max(1),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counts one request and sweeps when the interval is reached.
    pub fn record_request(&self) {
        let count = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        if count % self.interval == 0 {
            self.prune();
        }
    }

    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();

        tracing::debug!(
            tracked_clients = self.limiter.len(),
            "Pruned idle rate limiter entries"
        );
    }

    /// Number of client keys currently held by the limiter.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Middleware driving [`IdleClientPruner`]; attach it next to the limiter.
pub async fn prune_idle_clients(
    State(pruner): State<IdleClientPruner>,
    req: Request,
    next: Next,
) -> Response {
    pruner.record_request();
    next.run(req).await
}

/// Converts limiter failures into the service's JSON error format.
///
/// # Response Codes
///
/// - **429**: quota exhausted; carries `Retry-After` and `X-RateLimit-After`
/// - **500**: the client address could not be determined
/// - other: whatever status the limiter reported
///
/// # Response
///
/// ```json
/// {
///   "error": {
///     "code": "rate_limit_exceeded",
///     "message": "Rate limit exceeded, retry in 2s",
///     "details": { "retry_after": 2 }
///   }
/// }
/// ```
pub fn rate_limit_error(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, headers } => {
            metrics::counter!("http_requests_rejected_total", "reason" => "rate_limited")
                .increment(1);

            AppError::too_many_requests(
                format!("Rate limit exceeded, retry in {wait_time}s"),
                json!({ "retry_after": wait_time }),
                headers.unwrap_or_default(),
            )
            .into_response()
        }
        GovernorError::UnableToExtractKey => {
            tracing::error!("Rate limiter could not determine the client address");

            AppError::internal(
                "Unable to identify client",
                json!({ "reason": "client address unavailable" }),
            )
            .into_response()
        }
        GovernorError::Other { code, msg, headers } => {
            let status = if code.is_client_error() || code.is_server_error() {
                code
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };

            let mut response = AppError::other(
                status,
                msg.unwrap_or_else(|| "Request rejected".to_string()),
                json!({}),
            )
            .into_response();

            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }

            response
        }
    }
}
