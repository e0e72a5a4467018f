//! Middleware for Company Service.
//!
//! # Components
//!
//! - `http_metrics` - HTTP request metrics (outermost)
//! - `request_id` - Per-request id and tracing span
//! - `request_log` - `REQUEST_STARTED` / `REQUEST_COMPLETED` log lines
//! - `auth` - Bearer token authentication for restricted routes
//! - `country` - Geo-IP country restriction for restricted routes
//! - `error_envelope` - JSON envelope for framework 404/405/408 responses

pub mod auth;
pub mod country;
pub mod error_envelope;
pub mod http_metrics;
pub mod request_id;
pub mod request_log;

pub use auth::{require_auth, AuthState};
pub use country::{require_allowed_country, CountryState};
pub use error_envelope::envelope_bare_errors;
pub use http_metrics::http_metrics_middleware;
pub use request_id::{tag_request_id, RequestContext, REQUEST_ID_HEADER};
pub use request_log::log_request_boundaries;
