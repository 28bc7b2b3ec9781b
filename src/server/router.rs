//! Route resolution and request dispatch.
//!
//! Exact-match routes take precedence over the `/` catch-all prefix.
//! Every route, including `/metrics`, runs under the instrumentation
//! middleware.

use crate::server::handlers;
use crate::server::middleware::instrumented;
use crate::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::{debug, instrument};

/// A registered route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Metrics,
    Version,
    Health,
    ServerName,
    Frontpage,
}

impl Route {
    /// Resolve the route template for a request path.
    ///
    /// Returns `None` only for paths outside the `/` prefix (e.g. the
    /// asterisk form); such requests are served but not route-labeled.
    pub fn resolve(path: &str) -> Option<Route> {
        match path {
            "/metrics" => Some(Route::Metrics),
            "/version" => Some(Route::Version),
            "/health" => Some(Route::Health),
            "/servername" => Some(Route::ServerName),
            p if p.starts_with('/') => Some(Route::Frontpage),
            _ => None,
        }
    }

    /// The registered pattern, as opposed to the literal request path.
    pub fn template(&self) -> &'static str {
        match self {
            Route::Metrics => "/metrics",
            Route::Version => "/version",
            Route::Health => "/health",
            Route::ServerName => "/servername",
            Route::Frontpage => "/",
        }
    }
}

/// Dispatch one request to its handler under instrumentation.
#[instrument(skip_all, fields(
    method = %req.method(),
    path = %req.uri().path(),
    client = %client_addr
))]
pub(crate) async fn dispatch(
    req: Request<Incoming>,
    state: AppState,
    client_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let route = Route::resolve(req.uri().path());
    debug!(route = route.map(|r| r.template()), "dispatching request");

    let metrics = state.metrics().clone();

    let response = instrumented(route, &metrics, move |sink| async move {
        match route {
            Some(Route::Metrics) => handlers::metrics(&state, sink).await,
            Some(Route::Version) => handlers::version(sink).await,
            Some(Route::Health) => handlers::health(req, &state, sink).await,
            Some(Route::ServerName) => handlers::server_name(sink).await,
            Some(Route::Frontpage) | None => {
                handlers::frontpage(req.headers(), &state, client_addr, sink).await
            }
        }
    })
    .await;

    Ok(response)
}
