//! idserve - a minimal identity-reporting HTTP service
//!
//! This crate provides a small HTTP server that:
//! - Reports its own identity (hostname, version, instance number, IPs)
//! - Exposes a mutable, externally-settable health status
//! - Records per-route request counts and latency as Prometheus metrics

pub mod config;
pub mod health;
pub mod identity;
pub mod metrics;
pub mod server;
pub mod state;
pub mod util;

pub use state::AppState;
