//! The fixed security and performance header set.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use std::time::Duration;

use super::csp::ContentSecurityPolicy;

pub const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000; includeSubDomains; preload";
pub const X_CONTENT_TYPE_OPTIONS: &str = "nosniff";
pub const X_FRAME_OPTIONS: &str = "DENY";
pub const X_XSS_PROTECTION: &str = "1; mode=block";
pub const REFERRER_POLICY: &str = "strict-origin-when-cross-origin";
pub const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=()";
pub const CACHE_CONTROL_GET: &str = "public, max-age=3600";
pub const CACHE_CONTROL_OTHER: &str = "no-cache";
pub const POWERED_BY: &str = "WSS13-Framework";

pub static PERMISSIONS_POLICY_HEADER: HeaderName = HeaderName::from_static("permissions-policy");
pub static X_RESPONSE_TIME_HEADER: HeaderName = HeaderName::from_static("x-response-time");
pub static X_POWERED_BY_HEADER: HeaderName = HeaderName::from_static("x-powered-by");

/// Headers written on every response, overwriting same-named values.
///
/// Built once at startup. The per-request parts (`X-Response-Time`,
/// `Cache-Control`) are computed in [`SecurityHeaders::apply`].
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    fixed: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
    /// Builds the header set around the given CSP.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered policy is not a valid header value.
    pub fn new(csp: &ContentSecurityPolicy) -> Result<Self, header::InvalidHeaderValue> {
        let csp = HeaderValue::try_from(csp.to_string())?;

        let fixed = vec![
            (
                header::STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_static(STRICT_TRANSPORT_SECURITY),
            ),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static(X_CONTENT_TYPE_OPTIONS),
            ),
            (
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static(X_FRAME_OPTIONS),
            ),
            (
                header::X_XSS_PROTECTION,
                HeaderValue::from_static(X_XSS_PROTECTION),
            ),
            (
                header::REFERRER_POLICY,
                HeaderValue::from_static(REFERRER_POLICY),
            ),
            (
                PERMISSIONS_POLICY_HEADER.clone(),
                HeaderValue::from_static(PERMISSIONS_POLICY),
            ),
            (header::CONTENT_SECURITY_POLICY, csp),
        ];

        Ok(Self { fixed })
    }

    pub fn fixed(&self) -> &[(HeaderName, HeaderValue)] {
        &self.fixed
    }

    /// Overwrites the full header set on `headers`.
    pub fn apply(&self, headers: &mut HeaderMap, method: &Method, elapsed: Duration) {
        for (name, value) in &self.fixed {
            headers.insert(name.clone(), value.clone());
        }

        // Only digits, '.' and "ms", so conversion never fails.
        if let Ok(value) = HeaderValue::try_from(format_response_time(elapsed)) {
            headers.insert(X_RESPONSE_TIME_HEADER.clone(), value);
        }

        headers.insert(header::CACHE_CONTROL, cache_control_for(method));
        headers.insert(
            X_POWERED_BY_HEADER.clone(),
            HeaderValue::from_static(POWERED_BY),
        );
    }
}

/// Formats a duration as milliseconds with two decimals, e.g. `12.34ms`.
pub fn format_response_time(elapsed: Duration) -> String {
    format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0)
}

/// `GET` responses are publicly cacheable for an hour; everything else is not.
pub fn cache_control_for(method: &Method) -> HeaderValue {
    if *method == Method::GET {
        HeaderValue::from_static(CACHE_CONTROL_GET)
    } else {
        HeaderValue::from_static(CACHE_CONTROL_OTHER)
    }
}
