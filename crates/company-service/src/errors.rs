//! Company Service error types.
//!
//! All errors map to an HTTP status code and an error envelope via the
//! `IntoResponse` impl. Messages for 5xx responses never carry internal
//! details; those are logged server-side where the error is raised.

use crate::envelope;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Message returned to clients for database failures that reach the
/// response boundary without a more specific message.
const GENERIC_INTERNAL_MESSAGE: &str = "internal error";

/// Company Service error type.
///
/// Maps to HTTP status codes:
/// - BadRequest: 400 Bad Request
/// - Unauthorized: 401 Unauthorized
/// - Forbidden: 403 Forbidden
/// - NotFound: 404 Not Found
/// - Database, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Internal failure. The message is returned to the client as-is and
    /// must already be sanitized.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompanyError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CompanyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CompanyError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CompanyError::Forbidden(_) => StatusCode::FORBIDDEN,
            CompanyError::NotFound(_) => StatusCode::NOT_FOUND,
            CompanyError::Database(_) | CompanyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CompanyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            CompanyError::Database(err) => {
                tracing::error!(target: "company.database", error = %err, "Database operation failed");
                GENERIC_INTERNAL_MESSAGE.to_string()
            }
            CompanyError::BadRequest(msg)
            | CompanyError::Unauthorized(msg)
            | CompanyError::Forbidden(msg)
            | CompanyError::NotFound(msg)
            | CompanyError::Internal(msg) => msg,
        };

        let mut response = envelope::error(status, message).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                "WWW-Authenticate",
                HeaderValue::from_static("Bearer realm=\"company-service\""),
            );
        }

        response
    }
}

/// Convert sqlx errors to CompanyError
impl From<sqlx::Error> for CompanyError {
    fn from(err: sqlx::Error) -> Self {
        CompanyError::Database(err.to_string())
    }
}
