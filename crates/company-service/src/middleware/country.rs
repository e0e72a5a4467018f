//! Country restriction middleware.
//!
//! Resolves the caller's IP (the connection's remote address) to a country
//! and only lets requests from the configured country through.

use crate::errors::CompanyError;
use crate::observability::metrics::record_access_check;
use crate::services::CountryDetector;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::instrument;

const VERIFY_FAILED: &str = "verify client country failed";

/// State for the country restriction middleware.
#[derive(Clone)]
pub struct CountryState {
    pub country_detector: Arc<dyn CountryDetector>,

    /// Compared verbatim against the detected country name.
    pub allowed_country_name: String,
}

/// Reject callers outside the allowed country.
///
/// # Response
///
/// - 500 `verify client country failed` if the remote address is unknown or the lookup fails
/// - 403 `access denied` if the country does not match
/// - Otherwise continues to the next handler
#[instrument(skip_all, name = "company.middleware.country")]
pub async fn require_allowed_country(
    State(state): State<Arc<CountryState>>,
    req: Request,
    next: Next,
) -> Result<Response, CompanyError> {
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .ok_or_else(|| {
            tracing::error!(target: "company.middleware.country", "Remote address unavailable");
            record_access_check("country", "error");
            CompanyError::Internal(VERIFY_FAILED.to_string())
        })?;

    let country = state
        .country_detector
        .country_by_ip(&client_ip)
        .await
        .map_err(|e| {
            tracing::error!(target: "company.middleware.country", error = %e, "Country lookup failed");
            record_access_check("country", "error");
            CompanyError::Internal(VERIFY_FAILED.to_string())
        })?;

    if country != state.allowed_country_name {
        tracing::info!(
            target: "company.middleware.country",
            country = %country,
            "Request from disallowed country"
        );
        record_access_check("country", "rejected");
        return Err(CompanyError::Forbidden("access denied".to_string()));
    }

    record_access_check("country", "allowed");
    Ok(next.run(req).await)
}
