//! Request boundary logging.
//!
//! Emits `REQUEST_STARTED` before and `REQUEST_COMPLETED` after the rest of
//! the chain. Runs inside the request id span, so both lines carry
//! `x_request_id`.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

pub async fn log_request_boundaries(req: Request, next: Next) -> Response {
    let request = format!("{} {}", req.method(), req.uri());
    let start = Instant::now();

    tracing::info!(target: "company.middleware.request", request = %request, "REQUEST_STARTED");

    let response = next.run(req).await;

    tracing::info!(
        target: "company.middleware.request",
        request = %request,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "REQUEST_COMPLETED"
    );

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::middleware::request_id::{tag_request_id, REQUEST_ID_HEADER};
    use axum::{body::Body, http::StatusCode, middleware, routing::post, Router};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Writer that appends formatted log lines to a shared buffer.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn teapot() -> StatusCode {
        StatusCode::IM_A_TEAPOT
    }

    fn test_app() -> Router {
        Router::new()
            .route("/brew", post(teapot))
            .layer(middleware::from_fn(log_request_boundaries))
            .layer(middleware::from_fn(tag_request_id))
    }

    fn brew_request() -> Request {
        Request::builder()
            .method("POST")
            .uri("/brew?kind=green")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let response = test_app().oneshot(brew_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_boundaries_logged_inside_request_span() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = test_app().oneshot(brew_request()).await.unwrap();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let lines = logs.lines();
        let started: Vec<&String> = lines
            .iter()
            .filter(|l| l.contains("REQUEST_STARTED"))
            .collect();
        let completed: Vec<&String> = lines
            .iter()
            .filter(|l| l.contains("REQUEST_COMPLETED"))
            .collect();

        assert_eq!(started.len(), 1, "logs: {lines:?}");
        assert_eq!(completed.len(), 1, "logs: {lines:?}");

        let span_field = format!("x_request_id={request_id}");
        for line in started.iter().chain(completed.iter()) {
            assert!(line.contains(&span_field), "missing span field: {line}");
            assert!(line.contains("request=POST /brew?kind=green"), "{line}");
        }
        assert!(completed.iter().all(|l| l.contains("status=418")));
        assert!(completed.iter().all(|l| l.contains("elapsed_ms=")));
    }
}
