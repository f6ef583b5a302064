//! HTTP request handlers for API endpoints.

pub mod fallback;
pub mod health;
pub mod root;

pub use fallback::fallback_handler;
pub use health::health_handler;
pub use root::root_handler;
