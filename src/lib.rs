//! # WSS13 Framework
//!
//! Security and performance middleware for WSS13 Framework services built
//! with Axum.
//!
//! ## Features
//!
//! - Security response headers (HSTS, CSP, frame/sniffing/XSS protection)
//! - Response timing (`X-Response-Time`) and method-based `Cache-Control`
//! - Trusted host allow-list with wildcard subdomains
//! - CORS restricted to the configured origins, with credentials
//! - Gzip compression above a size threshold
//! - Per-client rate limiting with structured `429` responses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wss13_framework::{config::SecurityConfig, routes::configure_app};
//!
//! let app = Router::new().route("/", get(root));
//! let app = configure_app(app, &SecurityConfig::default())?;
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod config;
pub mod error;
pub mod policy;
pub mod routes;
pub mod server;

pub use error::{AppError, SetupError};
pub use routes::{app_router, configure_app};

/// Commonly used types for external consumers.
pub mod prelude {
    pub use crate::config::{Config, SecurityConfig};
    pub use crate::error::{AppError, SetupError};
    pub use crate::policy::{ContentSecurityPolicy, SecurityHeaders, TrustedHosts};
    pub use crate::routes::{app_router, configure_app};
}
