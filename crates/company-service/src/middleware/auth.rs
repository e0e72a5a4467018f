//! Authentication middleware for restricted routes.
//!
//! Extracts the Bearer token from the Authorization header, validates it,
//! and injects the claims into request extensions.

use crate::auth::TokenValidator;
use crate::errors::CompanyError;
use crate::observability::metrics::record_access_check;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub token_validator: Arc<dyn TokenValidator>,
}

/// Require a valid bearer token.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// - 401 `bearer token required` if the header is absent or not a bearer credential
/// - 401 `invalid token` if validation fails
/// - Otherwise continues with `ClientTokenClaims` in extensions
#[instrument(skip_all, name = "company.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, CompanyError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            tracing::debug!(target: "company.middleware.auth", "Missing or malformed Authorization header");
            record_access_check("authn", "rejected");
            CompanyError::Unauthorized("bearer token required".to_string())
        })?;

    let claims = state.token_validator.validate_token(token).map_err(|e| {
        tracing::debug!(target: "company.middleware.auth", error = %e, "Token validation failed");
        record_access_check("authn", "rejected");
        CompanyError::Unauthorized("invalid token".to_string())
    })?;

    record_access_check("authn", "allowed");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
