//! Geo-IP country detection.
//!
//! Resolves a client IP to a country name by calling a third-party
//! geolocation endpoint as `GET {endpoint}/{ip}/json`, which answers with
//! `{"country_name": "..."}`.
//!
//! The lookup future is dropped together with the request that awaits it,
//! so a client disconnect or request timeout aborts the outbound call.

use crate::config::GeoIpConfig;
use crate::observability::metrics::record_geoip_lookup;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, instrument, warn};

/// Geo-IP lookup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeoIpError {
    #[error("failed to build geoip client: {0}")]
    Client(String),

    #[error("geoip request failed: {0}")]
    Request(String),

    #[error("unexpected geoip status code: {0}")]
    UnexpectedStatus(u16),

    #[error("decode geoip response failed: {0}")]
    Decode(String),
}

/// Detects the country a client IP belongs to.
#[async_trait::async_trait]
pub trait CountryDetector: Send + Sync {
    /// Return the country name for `client_ip`.
    async fn country_by_ip(&self, client_ip: &str) -> Result<String, GeoIpError>;
}

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    country_name: String,
}

/// HTTP client for the geolocation endpoint.
#[derive(Clone)]
pub struct GeoIpClient {
    client: Client,
    endpoint: String,
}

impl GeoIpClient {
    /// Create a client using the configured endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns `GeoIpError::Client` if the HTTP client cannot be built.
    pub fn new(config: &GeoIpConfig) -> Result<Self, GeoIpError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                error!(target: "company.services.geoip", error = %e, "Failed to build HTTP client");
                GeoIpError::Client(e.to_string())
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn lookup_url(&self, client_ip: &str) -> String {
        format!("{}/{}/json", self.endpoint, client_ip)
    }

    async fn lookup(&self, client_ip: &str) -> Result<String, GeoIpError> {
        let response = self
            .client
            .get(self.lookup_url(client_ip))
            .send()
            .await
            .map_err(|e| {
                warn!(target: "company.services.geoip", error = %e, "Geo-IP request failed");
                GeoIpError::Request(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(target: "company.services.geoip", status = %status, "Unexpected geo-IP status code");
            return Err(GeoIpError::UnexpectedStatus(status.as_u16()));
        }

        let body: GeoIpResponse = response.json().await.map_err(|e| {
            warn!(target: "company.services.geoip", error = %e, "Failed to decode geo-IP response");
            GeoIpError::Decode(e.to_string())
        })?;

        Ok(body.country_name)
    }
}

#[async_trait::async_trait]
impl CountryDetector for GeoIpClient {
    #[instrument(skip(self), name = "company.services.geoip.country_by_ip")]
    async fn country_by_ip(&self, client_ip: &str) -> Result<String, GeoIpError> {
        let start = Instant::now();
        let result = self.lookup(client_ip).await;
        let status = if result.is_ok() { "success" } else { "error" };
        record_geoip_lookup(status, start.elapsed());
        result
    }
}

/// Mock country detector module for testing.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Country detector returning a fixed answer.
    pub struct MockCountryDetector {
        country_name: Option<String>,
        call_count: AtomicUsize,
    }

    impl MockCountryDetector {
        /// Create a mock that resolves every IP to `country_name`.
        pub fn returning(country_name: &str) -> Self {
            Self {
                country_name: Some(country_name.to_string()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock whose lookups always fail.
        pub fn failing() -> Self {
            Self {
                country_name: None,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Number of lookups made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CountryDetector for MockCountryDetector {
        async fn country_by_ip(&self, _client_ip: &str) -> Result<String, GeoIpError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.country_name
                .clone()
                .ok_or(GeoIpError::UnexpectedStatus(503))
        }
    }

}
