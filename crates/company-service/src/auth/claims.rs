//! Bearer token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by a client API token.
///
/// Tokens are service-wide credentials: there is no subject or audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTokenClaims {
    /// Issuer, fixed per deployment.
    pub iss: String,

    /// Unique token identifier (UUID v4).
    pub jti: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}
