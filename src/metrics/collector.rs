//! Metrics collector using prometheus-client.
//!
//! Tracks per-route request counts, per-status response counts, and
//! per-route latency. The registry is constructed once at startup and
//! injected wherever it is needed; there is no global registration.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use std::time::Duration;

/// Labels for route-keyed metrics. The path is the registered route
/// template, not the literal request path.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct PathLabels {
    pub path: String,
}

/// Labels for status-keyed metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusLabels {
    pub status: String,
}

/// Collects and stores all metrics.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsCollectorInner>,
}

struct MetricsCollectorInner {
    /// Requests per route template.
    requests_total: Family<PathLabels, Counter>,
    /// Responses per status code.
    response_status: Family<StatusLabels, Counter>,
    /// Request duration histogram per route template (in seconds).
    response_time_seconds: Family<PathLabels, Histogram>,
    /// The prometheus registry.
    registry: Registry,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let requests_total = Family::<PathLabels, Counter>::default();
        let response_status = Family::<StatusLabels, Counter>::default();
        let response_time_seconds = Family::<PathLabels, Histogram>::new_with_constructor(|| {
            // Classic Prometheus default buckets: 5ms up to 10s.
            Histogram::new(
                [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0].into_iter(),
            )
        });

        registry.register(
            "http_requests",
            "Number of HTTP requests by route",
            requests_total.clone(),
        );
        registry.register(
            "response_status",
            "Status of HTTP responses",
            response_status.clone(),
        );
        registry.register(
            "http_response_time_seconds",
            "Duration of HTTP requests",
            response_time_seconds.clone(),
        );

        Self {
            inner: Arc::new(MetricsCollectorInner {
                requests_total,
                response_status,
                response_time_seconds,
                registry,
            }),
        }
    }

    /// Get the prometheus registry for encoding.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Record one completed request.
    ///
    /// The status counter always increments. The route counter and the
    /// duration observation are keyed by route template and are skipped
    /// when no template resolved for the request.
    pub fn record_request(&self, path: Option<&str>, status: u16, duration: Duration) {
        self.inner
            .response_status
            .get_or_create(&StatusLabels {
                status: status.to_string(),
            })
            .inc();

        if let Some(path) = path {
            let labels = PathLabels {
                path: path.to_string(),
            };
            self.inner.requests_total.get_or_create(&labels).inc();
            self.inner
                .response_time_seconds
                .get_or_create(&labels)
                .observe(duration.as_secs_f64());
        }
    }

    /// Encode all metrics in the OpenMetrics text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.inner.registry)?;
        Ok(buffer)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
