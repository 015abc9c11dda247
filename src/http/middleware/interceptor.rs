//! Request/response logging interceptor.
//!
//! Wraps every request passing through the router:
//!
//! - entry: INFO record with method, URI and client address, DEBUG record
//!   with the full header map, plus a best-effort body capture;
//! - dispatch: the next stage runs exactly once, behind `catch_unwind`;
//! - exit: INFO record with status and latency on success, or an ERROR
//!   record and a synthesized generic 500 when the handler panicked.
//!
//! Exactly one response leaves this stage per request, and the entry record
//! always precedes the exit record for the same request id. Log writes are
//! fire-and-forget; the sinks buffer internally.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::FutureExt;
use tokio::time;
use uuid::Uuid;

/// Characters of body text included in the log record.
const MAX_LOGGED_BODY_CHARS: usize = 2048;

/// Bound on the body read so a stalled client cannot pin the request.
const BODY_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings shared by every request passing through the interceptor.
#[derive(Debug, Clone, Copy)]
pub struct InterceptorSettings {
    /// Cap on how much of a request body is buffered for logging. Must not
    /// be below the listener's request body limit, or valid bodies would be
    /// dropped before the handler runs.
    pub max_captured_body_bytes: usize,
}

/// Middleware function logging every request and response.
pub async fn log_requests(
    State(settings): State<InterceptorSettings>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        client = %client,
        "Incoming request"
    );
    tracing::debug!(
        request_id = %request_id,
        headers = ?request.headers(),
        "Request headers"
    );

    let request = capture_body(request_id, request, settings.max_captured_body_bytes).await;

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                panic = %panic_message(panic.as_ref()),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Error processing request"
            );
            return internal_error();
        }
    };

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Response sent"
    );
    tracing::debug!(
        request_id = %request_id,
        headers = ?response.headers(),
        "Response headers"
    );

    response
}

/// Buffer the request body for logging, best effort.
///
/// An empty body logs nothing. An unreadable body (oversize, stalled read,
/// transport error) logs a placeholder notice and the request continues with
/// an empty body rather than aborting.
async fn capture_body(request_id: Uuid, request: Request, max_bytes: usize) -> Request {
    let (parts, body) = request.into_parts();
    match time::timeout(BODY_READ_TIMEOUT, to_bytes(body, max_bytes)).await {
        Ok(Ok(bytes)) => {
            if !bytes.is_empty() {
                let text = String::from_utf8_lossy(&bytes);
                tracing::debug!(
                    request_id = %request_id,
                    body = %truncate_chars(&text, MAX_LOGGED_BODY_CHARS),
                    "Request body"
                );
            }
            Request::from_parts(parts, Body::from(bytes))
        }
        Ok(Err(e)) => {
            tracing::debug!(request_id = %request_id, error = %e, "Unable to read request body");
            Request::from_parts(parts, Body::empty())
        }
        Err(_) => {
            tracing::debug!(request_id = %request_id, "Timed out reading request body");
            Request::from_parts(parts, Body::empty())
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Generic fallback response for handler faults. Internal detail stays in
/// the log, never in the client payload.
fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "internal server error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 3), "hél");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn panic_messages_downcast() {
        let boxed: Box<dyn Any + Send> = Box::new("static str panic");
        assert_eq!(panic_message(boxed.as_ref()), "static str panic");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned panic"));
        assert_eq!(panic_message(boxed.as_ref()), "owned panic");

        let boxed: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }
}
