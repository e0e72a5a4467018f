//! Bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs signed with the configured shared secret. They are
//! stateless: validity depends only on the signature and the `exp` claim,
//! so a leaked token stays valid until it expires.

use crate::auth::claims::ClientTokenClaims;
use crate::config::TokenConfig;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Maximum accepted token size in bytes (8KB).
///
/// Larger tokens are rejected before base64 decoding or signature checks.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Token errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not verify or the token has expired.
    #[error("invalid token")]
    InvalidToken,

    /// Token verified but its claims are not client token claims.
    #[error("unknown token type")]
    UnknownTokenType,

    /// Token could not be parsed.
    #[error("token parse failed: {0}")]
    Malformed(String),

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Validates bearer tokens presented by clients.
///
/// Abstracted so the authentication middleware can be exercised with
/// test doubles.
pub trait TokenValidator: Send + Sync {
    /// Verify the token and return its claims.
    fn validate_token(&self, token: &str) -> Result<ClientTokenClaims, TokenError>;
}

/// Issues and validates HS256 client tokens.
pub struct TokenService {
    issuer: String,
    ttl_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a token service from configuration.
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            issuer: config.issuer.clone(),
            ttl_seconds: i64::try_from(config.ttl.as_secs()).unwrap_or(i64::MAX),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token valid from now until now + TTL.
    pub fn issue_token(&self) -> Result<String, TokenError> {
        self.issue_token_at(Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_token_at(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = ClientTokenClaims {
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat.saturating_add(self.ttl_seconds),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(target: "company.auth.token", error = %e, "Token signing failed");
            TokenError::Signing(e.to_string())
        })
    }
}

impl TokenValidator for TokenService {
    #[instrument(skip_all, name = "company.auth.validate_token")]
    fn validate_token(&self, token: &str) -> Result<ClientTokenClaims, TokenError> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(target: "company.auth.token", size = token.len(), "Token exceeds size limit");
            return Err(TokenError::Malformed("token too large".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        let token_data =
            decode::<ClientTokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(target: "company.auth.token", error = %e, "Token validation failed");
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::ExpiredSignature => {
                        TokenError::InvalidToken
                    }
                    ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                        TokenError::UnknownTokenType
                    }
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        // jsonwebtoken accepts `exp == now`; a token is only valid strictly before `exp`.
        if token_data.claims.exp <= Utc::now().timestamp() {
            tracing::debug!(target: "company.auth.token", "Token expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}
