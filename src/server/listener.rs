//! HTTP listener.
//!
//! Accepts incoming connections and serves them with the dispatcher, one
//! spawned task per connection.

use crate::server::router::dispatch;
use crate::state::AppState;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// The HTTP server serving all routes.
pub struct HttpServer {
    listener: TcpListener,
    state: AppState,
}

impl HttpServer {
    /// Bind the listening socket.
    pub async fn bind<A: ToSocketAddrs>(addr: A, state: AppState) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "listener bound");
        Ok(Self { listener, state })
    }

    /// The bound local address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, client_addr)) => {
                            let state = self.state.clone();

                            tokio::spawn(async move {
                                let io = TokioIo::new(stream);
                                let service = service_fn(move |req| {
                                    dispatch(req, state.clone(), client_addr)
                                });

                                if let Err(e) = http1::Builder::new()
                                    .keep_alive(true)
                                    .serve_connection(io, service)
                                    .await
                                {
                                    debug!(error = %e, client = %client_addr, "connection error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    info!("server shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let state = AppState::new(Identity::discover());
        let server = HttpServer::bind("127.0.0.1:0", state).await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_surfaces_error() {
        let state = AppState::new(Identity::discover());
        let first = HttpServer::bind("127.0.0.1:0", state.clone()).await.unwrap();
        let addr = first.local_addr().unwrap();

        let second = HttpServer::bind(addr, state).await;
        assert!(second.is_err());
    }
}
