//! Shared application state.

use crate::health::HealthStatus;
use crate::identity::Identity;
use crate::metrics::MetricsCollector;
use std::sync::Arc;

/// Shared state accessible from all request-handling tasks.
#[derive(Clone)]
pub struct AppState {
    /// The externally settable health latch.
    health: Arc<HealthStatus>,

    /// Process-wide metrics registry.
    metrics: MetricsCollector,

    /// Identity discovered at startup.
    identity: Arc<Identity>,
}

impl AppState {
    /// Create new application state.
    pub fn new(identity: Identity) -> Self {
        Self {
            health: Arc::new(HealthStatus::new()),
            metrics: MetricsCollector::new(),
            identity: Arc::new(identity),
        }
    }

    /// Get the health latch.
    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    /// Get the metrics collector.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Get the instance identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_health_state() {
        let state = AppState::new(Identity {
            instance: 1,
            version: "v0",
            local_ip: String::new(),
        });

        let clone = state.clone();
        state.health().set("failed");
        assert!(clone.health().is_failed());
    }
}
