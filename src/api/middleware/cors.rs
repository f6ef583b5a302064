//! Cross-origin resource sharing policy.

use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::SecurityConfig;
use crate::error::SetupError;

/// Creates the CORS layer from the configured allow-lists.
///
/// # Policy
///
/// - **Origins**: exact match against `cors_allowed_origins`; other origins
///   get no `Access-Control-Allow-Origin` header
/// - **Methods**: `cors_allowed_methods`
/// - **Headers**: any; the preflight's `Access-Control-Request-Headers` is
///   echoed back, since a literal `*` is not honoured with credentials
/// - **Credentials**: `cors_allow_credentials`
/// - **Preflight cache**: `cors_max_age_seconds`
///
/// # Errors
///
/// Returns [`SetupError::InvalidOrigin`] for an origin that is not a valid
/// header value, or `*` combined with credentials, and
/// [`SetupError::InvalidMethod`] for a malformed method name.
pub fn layer(settings: &SecurityConfig) -> Result<CorsLayer, SetupError> {
    let allow_origin = if settings.cors_allowed_origins.iter().any(|o| o == "*") {
        if settings.cors_allow_credentials {
            return Err(SetupError::InvalidOrigin("*".to_string()));
        }
        AllowOrigin::any()
    } else {
        let origins = settings
            .cors_allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| SetupError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let methods = settings
        .cors_allowed_methods
        .iter()
        .map(|method| parse_method(method))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(settings.cors_allow_credentials)
        .max_age(Duration::from_secs(settings.cors_max_age_seconds)))
}

fn parse_method(raw: &str) -> Result<Method, SetupError> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(SetupError::InvalidMethod(raw.to_string()));
    }

    Method::from_bytes(normalized.as_bytes()).map_err(|_| SetupError::InvalidMethod(raw.to_string()))
}
