//! Bearer token authentication.
//!
//! # Components
//!
//! - `claims` - Client token claims
//! - `token` - Token issuance (HS256) and validation

pub mod claims;
pub mod token;

pub use claims::ClientTokenClaims;
pub use token::{TokenError, TokenService, TokenValidator, MAX_TOKEN_SIZE_BYTES};
