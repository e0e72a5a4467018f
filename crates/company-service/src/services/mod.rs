//! Service layer for Company Service.
//!
//! # Components
//!
//! - `geoip` - HTTP client for the geolocation endpoint used by the
//!   country restriction middleware

pub mod geoip;

pub use geoip::mock::MockCountryDetector;
pub use geoip::{CountryDetector, GeoIpClient, GeoIpError};
