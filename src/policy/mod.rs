//! Security policy values shared by the HTTP middleware.
//!
//! Everything in this module is pure data: it is built once at startup,
//! validated, and then shared read-only across requests.
//!
//! - [`csp`] - Content-Security-Policy directives and rendering
//! - [`headers`] - The fixed response header set written on every response
//! - [`host`] - Trusted host patterns and matching

pub mod csp;
pub mod headers;
pub mod host;

pub use csp::ContentSecurityPolicy;
pub use headers::SecurityHeaders;
pub use host::{HostPattern, TrustedHosts};
