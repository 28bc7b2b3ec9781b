//! Externally settable health state.

mod status;

pub use status::HealthStatus;
