//! Request id tagging.
//!
//! Every request gets a fresh UUID v4. It is stored in a [`RequestContext`]
//! extension, attached to a tracing span that wraps the rest of the chain,
//! and echoed back in the `x-request-id` response header.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request state available to downstream middleware and handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Uuid,
}

/// Tag the request with a new id. Never rejects.
pub async fn tag_request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    req.extensions_mut().insert(RequestContext { request_id });

    let span = tracing::info_span!("request", x_request_id = %request_id);
    let mut response = next.run(req).instrument(span).await;

    // A hyphenated UUID is always a valid header value.
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
