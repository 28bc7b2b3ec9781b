//! Metrics collection and exposition.

mod collector;

pub use collector::MetricsCollector;
