//! HTTP surface: dispatcher, handlers, and request instrumentation.

mod handlers;
mod listener;
mod middleware;
mod router;
mod sink;

pub use listener::HttpServer;
pub use middleware::instrumented;
pub use router::Route;
pub use sink::ResponseSink;
