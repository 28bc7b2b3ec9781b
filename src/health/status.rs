//! The shared health status value.
//!
//! A single process-wide string, set by POSTing to `/health` and read by
//! every health check. Reads and writes go through an atomic pointer swap,
//! so a reader can never observe a partially written value.

use arc_swap::ArcSwap;
use std::sync::Arc;

/// Externally settable liveness latch.
///
/// Starts empty (a fresh process is healthy by default) and holds the raw
/// string from the most recent POST, case preserved. There is no transition
/// back to the empty state other than posting an empty value.
#[derive(Debug)]
pub struct HealthStatus {
    current: ArcSwap<String>,
}

impl HealthStatus {
    /// Create a new, unset health status.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(String::new()),
        }
    }

    /// The currently stored status string, raw case preserved.
    pub fn get(&self) -> Arc<String> {
        self.current.load_full()
    }

    /// Replace the stored status with the raw posted value.
    pub fn set(&self, status: &str) {
        self.current.store(Arc::new(status.to_string()));
    }

    /// Whether the stored value marks this instance as failed.
    ///
    /// The comparison is case-insensitive; only `"failed"` trips the latch.
    pub fn is_failed(&self) -> bool {
        self.current.load().eq_ignore_ascii_case("failed")
    }

    /// Whether the stored value passes the "ok" check (case-insensitive).
    pub fn is_ok(&self) -> bool {
        self.current.load().eq_ignore_ascii_case("ok")
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}
