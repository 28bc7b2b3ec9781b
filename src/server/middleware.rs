//! Request instrumentation.
//!
//! Wraps every handler invocation to capture the emitted status code and
//! the elapsed wall time, without altering handler behavior. Recording is
//! best-effort telemetry and can never fail the request.

use crate::metrics::MetricsCollector;
use crate::server::router::Route;
use crate::server::sink::ResponseSink;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::future::Future;
use std::time::Instant;

/// Run a handler under instrumentation.
///
/// For every completed request this records exactly one status-code
/// increment, and (when a route template resolved) exactly one route
/// increment and one duration observation keyed by that template.
pub async fn instrumented<H, Fut>(
    route: Option<Route>,
    metrics: &MetricsCollector,
    handler: H,
) -> Response<Full<Bytes>>
where
    H: FnOnce(ResponseSink) -> Fut,
    Fut: Future<Output = ResponseSink>,
{
    let start = Instant::now();

    let sink = handler(ResponseSink::new()).await;

    let status = sink.status();
    metrics.record_request(
        route.map(|r| r.template()),
        status.as_u16(),
        start.elapsed(),
    );

    sink.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[tokio::test]
    async fn test_records_route_and_status() {
        let metrics = MetricsCollector::new();

        let response = instrumented(Some(Route::Health), &metrics, |mut sink| async move {
            sink.set_status(StatusCode::SERVICE_UNAVAILABLE);
            sink.write_str("failed");
            sink
        })
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let text = metrics.encode().unwrap();
        assert!(text.contains("http_requests_total{path=\"/health\"} 1"));
        assert!(text.contains("response_status_total{status=\"503\"} 1"));
        assert!(text.contains("http_response_time_seconds_count{path=\"/health\"} 1"));
    }

    #[tokio::test]
    async fn test_implicit_200_when_handler_sets_nothing() {
        let metrics = MetricsCollector::new();

        let response = instrumented(Some(Route::Frontpage), &metrics, |sink| async move { sink })
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = metrics.encode().unwrap();
        assert!(text.contains("response_status_total{status=\"200\"} 1"));
    }

    #[tokio::test]
    async fn test_unresolvable_route_skips_path_labels() {
        let metrics = MetricsCollector::new();

        let response = instrumented(None, &metrics, |sink| async move { sink }).await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = metrics.encode().unwrap();
        assert!(text.contains("response_status_total{status=\"200\"} 1"));
        assert!(!text.contains("http_requests_total{"));
    }

    #[tokio::test]
    async fn test_one_increment_per_request() {
        let metrics = MetricsCollector::new();

        for _ in 0..3 {
            let _ = instrumented(Some(Route::Version), &metrics, |sink| async move { sink }).await;
        }

        let text = metrics.encode().unwrap();
        assert!(text.contains("http_requests_total{path=\"/version\"} 3"));
        assert!(text.contains("response_status_total{status=\"200\"} 3"));
    }
}
