//! HTTP request handlers for Company Service.

pub mod companies;
pub mod health;
pub mod metrics;

pub use companies::{create_company, delete_company, get_company, search_companies};
pub use health::health_check;
pub use metrics::metrics_handler;
