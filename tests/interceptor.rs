//! Interceptor behavior: guaranteed responses, paired log records, body
//! capture edge cases.
//!
//! These drive a router directly with `oneshot` and capture log output with
//! an in-memory sink, so assertions cover both the response and the records.

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{middleware, Router};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

use storefront::http::middleware::interceptor::{log_requests, InterceptorSettings};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Capture {
        self.clone()
    }
}

fn capture_logs() -> (Capture, tracing::subscriber::DefaultGuard) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(capture.clone())
            .with_ansi(false),
    );
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

async fn boom_handler() {
    panic!("boom handler exploded");
}

fn test_router_with_cap(max_captured_body_bytes: usize) -> Router {
    let settings = InterceptorSettings {
        max_captured_body_bytes,
    };
    Router::new()
        .route("/ok", get(|| async { "ok" }))
        .route("/echo", post(|body: String| async move { body }))
        .route("/boom", get(boom_handler))
        .layer(middleware::from_fn_with_state(settings, log_requests))
}

fn test_router() -> Router {
    test_router_with_cap(1024 * 1024)
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn panicking_handler_yields_generic_500() {
    let (capture, _guard) = capture_logs();

    let response = test_router()
        .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "internal server error");

    let logs = capture.contents();
    assert!(logs.contains("Incoming request"));
    assert!(logs.contains("Error processing request"));
    assert!(logs.contains("boom handler exploded"));
    // The panic text stays server-side only.
    assert!(!logs.contains("Response sent"));
}

#[tokio::test]
async fn empty_body_logs_no_body_field() {
    let (capture, _guard) = capture_logs();

    let response = test_router()
        .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");

    let logs = capture.contents();
    assert!(logs.contains("Incoming request"));
    assert!(logs.contains("Response sent"));
    assert!(!logs.contains("Request body"));
}

#[tokio::test]
async fn captured_body_reaches_the_handler_intact() {
    let (capture, _guard) = capture_logs();

    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .body(Body::from("hello catalog"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"hello catalog");

    let logs = capture.contents();
    assert!(logs.contains("Request body"));
    assert!(logs.contains("hello catalog"));
}

#[tokio::test]
async fn oversize_body_logs_notice_and_continues() {
    let (capture, _guard) = capture_logs();

    // Above the 1 MiB capture cap; the read fails and the request continues
    // with an empty body instead of aborting.
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .body(Body::from(vec![b'a'; 2 * 1024 * 1024]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let logs = capture.contents();
    assert!(logs.contains("Unable to read request body"));
    assert!(logs.contains("Response sent"));
}

#[tokio::test]
async fn raised_capture_cap_keeps_large_body_intact() {
    let (capture, _guard) = capture_logs();

    // A body between the old 1 MiB default and a raised limit must reach
    // the handler unchanged.
    let payload = vec![b'a'; 2 * 1024 * 1024];
    let response = test_router_with_cap(4 * 1024 * 1024)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, payload);

    let logs = capture.contents();
    assert!(logs.contains("Request body"));
    assert!(!logs.contains("Unable to read request body"));
}

#[tokio::test]
async fn entry_precedes_exit_and_records_pair_by_request_id() {
    let (capture, _guard) = capture_logs();

    let router = test_router();
    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let logs = capture.contents();
    let entries: Vec<&str> = logs
        .lines()
        .filter(|l| l.contains("Incoming request"))
        .collect();
    let exits: Vec<&str> = logs
        .lines()
        .filter(|l| l.contains("Response sent"))
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(exits.len(), 2);

    for entry in &entries {
        let id = field_value(entry, "request_id");
        let exit = exits
            .iter()
            .find(|l| field_value(l, "request_id") == id)
            .expect("entry record without a matching exit record");
        let entry_pos = logs.find(entry).unwrap();
        let exit_pos = logs.find(exit).unwrap();
        assert!(entry_pos < exit_pos, "entry must precede exit");
    }
}

fn field_value<'a>(line: &'a str, field: &str) -> &'a str {
    let start = line
        .find(&format!("{}=", field))
        .expect("field missing from record")
        + field.len()
        + 1;
    let rest = &line[start..];
    rest.split_whitespace().next().unwrap_or(rest)
}
