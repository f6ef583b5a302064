//! HTTP middleware for request processing and protection.
//!
//! Each module exposes a constructor that [`crate::routes::configure_app`]
//! attaches to the router:
//!
//! - [`security_headers`] - Fixed security/performance response headers
//! - [`cors`] - Cross-origin policy
//! - [`trusted_host`] - Host header allow-list
//! - [`compression`] - Gzip for large bodies
//! - [`rate_limit`] - Per-client token bucket with structured 429 responses
//! - [`tracing`] - Request/response logging

pub mod compression;
pub mod cors;
pub mod rate_limit;
pub mod security_headers;
pub mod tracing;
pub mod trusted_host;
