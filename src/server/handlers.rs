//! Route handlers.
//!
//! Handlers write into the [`ResponseSink`] and never touch the network
//! response directly. Collaborator failures (hostname lookup, body reads)
//! degrade to empty strings; the only user-visible failure signal is the
//! 503 used for "unhealthy", which is a semantic response, not an error.

use crate::identity::{self, APP_VERSION};
use crate::server::sink::ResponseSink;
use crate::state::AppState;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::{HeaderMap, Method, Request, StatusCode};
use std::net::SocketAddr;
use tracing::{debug, error};

const PROMETHEUS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// `GET /metrics`: Prometheus text exposition of all recorded metrics.
pub(crate) async fn metrics(state: &AppState, mut sink: ResponseSink) -> ResponseSink {
    match state.metrics().encode() {
        Ok(text) => {
            sink.set_content_type(PROMETHEUS_CONTENT_TYPE);
            sink.write_str(&text);
        }
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            sink.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            sink.write_str("failed to encode metrics\n");
        }
    }
    sink
}

/// `GET /version`: the fixed version string, newline-terminated.
pub(crate) async fn version(mut sink: ResponseSink) -> ResponseSink {
    sink.write_str(APP_VERSION);
    sink.write_str("\n");
    sink
}

/// `GET /servername`: the machine hostname.
pub(crate) async fn server_name(mut sink: ResponseSink) -> ResponseSink {
    sink.write_str(&identity::hostname());
    sink
}

/// `/health`: verb-gated health latch.
///
/// POST stores the raw `status` form field and answers 200 only when it
/// case-insensitively equals "ok". Any other verb is a pure read: only a
/// stored "failed" (case-insensitive) yields 503 — every other value,
/// including garbage and the initial empty state, falls through to the
/// implicit 200.
pub(crate) async fn health(
    req: Request<Incoming>,
    state: &AppState,
    mut sink: ResponseSink,
) -> ResponseSink {
    if req.method() == Method::POST {
        let posted = read_status_field(req).await;
        state.health().set(&posted);

        if posted.eq_ignore_ascii_case("ok") {
            sink.set_status(StatusCode::OK);
        } else {
            sink.set_status(StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    let current = state.health().get();
    if current.eq_ignore_ascii_case("failed") {
        sink.set_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    sink.write_str(&current);
    sink
}

/// Catch-all: the identity banner.
pub(crate) async fn frontpage(
    headers: &HeaderMap,
    state: &AppState,
    client_addr: SocketAddr,
    mut sink: ResponseSink,
) -> ResponseSink {
    let client_ip = identity::client_ip(headers, client_addr);
    sink.write_str(&state.identity().banner(&client_ip));
    sink
}

/// Read the `status` form field from a POST body.
///
/// A malformed or unreadable body, or a missing field, degrades to the
/// empty string.
async fn read_status_field(req: Request<Incoming>) -> String {
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!(error = %e, "failed to read health POST body");
            return String::new();
        }
    };

    form_urlencoded::parse(&body)
        .find(|(name, _)| name == "status")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    fn test_state() -> AppState {
        AppState::new(Identity {
            instance: 7,
            version: "v0.0.1",
            local_ip: "10.1.2.3".to_string(),
        })
    }

    #[tokio::test]
    async fn test_version_handler() {
        let sink = version(ResponseSink::new()).await;
        assert_eq!(sink.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_handler_returns_exposition() {
        let state = test_state();
        state
            .metrics()
            .record_request(Some("/"), 200, std::time::Duration::from_millis(1));

        let sink = metrics(&state, ResponseSink::new()).await;
        assert_eq!(sink.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_frontpage_uses_forwarded_ip() {
        let state = test_state();
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "9.9.9.9".parse().unwrap());

        let sink = frontpage(
            &headers,
            &state,
            "127.0.0.1:1234".parse().unwrap(),
            ResponseSink::new(),
        )
        .await;

        assert_eq!(sink.status(), StatusCode::OK);
    }
}
