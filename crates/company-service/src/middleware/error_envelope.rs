//! Envelope for framework-generated error responses.
//!
//! Unmatched routes (404), unsupported methods (405), and request timeouts
//! (408) are produced by axum and tower-http with an empty body. This layer
//! replaces any error response that carries no `Content-Type` with an
//! `{"error": "..."}` envelope of the same status. Responses built by
//! handlers and middleware already carry `application/json` and pass through.

use crate::envelope;
use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

pub async fn envelope_bare_errors(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let message = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_ascii_lowercase();

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let mut enveloped = envelope::error(status, message).into_response();

    // Keep framework headers such as `Allow` on 405.
    for (name, value) in enveloped.headers_mut().drain() {
        if let Some(name) = name {
            parts.headers.insert(name, value);
        }
    }
    let body = enveloped.into_body();

    Response::from_parts(parts, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::errors::CompanyError;
    use axum::{
        body::Body,
        http::StatusCode,
        middleware,
        routing::{get, post},
        Router,
    };
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    async fn slow() -> StatusCode {
        tokio::time::sleep(Duration::from_secs(5)).await;
        StatusCode::OK
    }

    async fn not_found_company() -> CompanyError {
        CompanyError::NotFound("company not found".to_string())
    }

    async fn empty_ok() -> StatusCode {
        StatusCode::OK
    }

    fn test_app() -> Router {
        Router::new()
            .route("/slow", get(slow))
            .route("/companies", post(empty_ok))
            .route("/missing-company", get(not_found_company))
            .layer(TimeoutLayer::new(Duration::from_millis(50)))
            .layer(middleware::from_fn(envelope_bare_errors))
    }

    async fn send(method: &str, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    fn json(body: &[u8]) -> serde_json::Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route_is_enveloped() {
        let (status, headers, body) = send("GET", "/nowhere").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(json(&body), serde_json::json!({"error": "not found"}));
    }

    #[tokio::test]
    async fn test_method_not_allowed_is_enveloped_and_keeps_allow() {
        let (status, headers, body) = send("GET", "/companies").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(headers.contains_key(header::ALLOW));
        assert_eq!(
            json(&body),
            serde_json::json!({"error": "method not allowed"})
        );
    }

    #[tokio::test]
    async fn test_timeout_is_enveloped() {
        let (status, _, body) = send("GET", "/slow").await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(json(&body), serde_json::json!({"error": "request timeout"}));
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        let (status, _, body) = send("GET", "/missing-company").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json(&body),
            serde_json::json!({"error": "company not found"})
        );
    }

    #[tokio::test]
    async fn test_success_without_body_is_untouched() {
        let (status, _, body) = send("POST", "/companies").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }
}
