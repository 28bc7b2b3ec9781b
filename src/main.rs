//! idserve - a minimal identity-reporting HTTP service
//!
//! Configured through the environment: HOST, PORT, LOG_LEVEL, LOG_FORMAT.

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{error, info};

use idserve::config::{load_config, Config};
use idserve::identity::Identity;
use idserve::server::HttpServer;
use idserve::util::init_logging;
use idserve::AppState;

fn main() -> Result<()> {
    let config = load_config().context("invalid environment configuration")?;

    init_logging(&config.log_level, &config.log_format);

    info!(
        host = %config.host,
        port = config.port,
        "idserve starting"
    );

    run(config)
}

/// Run the service with the given configuration.
fn run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    runtime.block_on(async { run_async(config).await })
}

/// Async entry point for the service.
async fn run_async(config: Config) -> Result<()> {
    let identity = Identity::discover();
    info!(
        instance = identity.instance,
        version = identity.version,
        local_ip = %identity.local_ip,
        "instance identity"
    );

    let state = AppState::new(identity);

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let server = HttpServer::bind((config.host.as_str(), config.port), state)
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;

    let handle = tokio::spawn(server.run(shutdown_tx.subscribe()));

    info!("idserve is running");

    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("received shutdown signal");
        }
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal");
        }
    }

    let _ = shutdown_tx.send(());
    let _ = handle.await;

    info!("idserve shut down complete");
    Ok(())
}
