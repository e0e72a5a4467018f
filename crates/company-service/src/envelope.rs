//! JSON response envelope.
//!
//! Every response body has the shape `{"data": ..., "error": "..."}` with
//! absent members omitted, so an empty success is `{}`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Response body wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An envelope paired with the status code it is sent with.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

/// 200 OK with a payload.
pub fn ok<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        status: StatusCode::OK,
        body: Envelope {
            data: Some(data),
            error: None,
        },
    }
}

/// 200 OK with an empty body (`{}`).
pub fn ok_empty() -> ApiResponse<()> {
    ApiResponse {
        status: StatusCode::OK,
        body: Envelope {
            data: None,
            error: None,
        },
    }
}

/// 201 Created with the created resource.
pub fn created<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        status: StatusCode::CREATED,
        body: Envelope {
            data: Some(data),
            error: None,
        },
    }
}

/// Error envelope with the given status.
pub fn error(status: StatusCode, message: impl Into<String>) -> ApiResponse<()> {
    ApiResponse {
        status,
        body: Envelope {
            data: None,
            error: Some(message.into()),
        },
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // Encode before any part of the response exists so a failure can
        // still change the status.
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(target: "company.envelope", error = %e, "encode response failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
