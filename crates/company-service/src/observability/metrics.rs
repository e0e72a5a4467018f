//! Metrics definitions for Company Service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `company_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: normalized paths (UUID segments collapsed to `{id}`)
//! - `status`: success, error, timeout
//! - `operation`: bounded by repository functions
//! - `outcome`: bounded by auth middleware outcomes

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle used
/// to serve `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder cannot be installed (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("company_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("company_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("company_geoip_lookup".to_string()),
            &[0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000],
        )
        .map_err(|e| format!("Failed to set geo-IP lookup buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record HTTP request completion.
///
/// Metric: `company_http_requests_total`, `company_http_request_duration_seconds`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("company_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("company_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Record a database query.
///
/// Metric: `company_db_queries_total`, `company_db_query_duration_seconds`
pub fn record_db_query(operation: &str, status: &str, duration: Duration) {
    histogram!("company_db_query_duration_seconds",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("company_db_queries_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a geo-IP lookup.
///
/// Metric: `company_geoip_lookups_total`, `company_geoip_lookup_duration_seconds`
pub fn record_geoip_lookup(status: &str, duration: Duration) {
    histogram!("company_geoip_lookup_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("company_geoip_lookups_total", "status" => status.to_string()).increment(1);
}

/// Record the outcome of an access check in the middleware chain.
///
/// Metric: `company_access_checks_total`
/// Labels: `check` (authn, country), `outcome` (allowed, rejected, error)
pub fn record_access_check(check: &str, outcome: &str) {
    counter!("company_access_checks_total",
        "check" => check.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Collapse UUID path segments so each route maps to one label value.
fn normalize_endpoint(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if uuid::Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
