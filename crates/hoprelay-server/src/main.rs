//! Main entry point for a hoprelay node.
//!
//! Loads configuration, opens this node's rule store and serves the node API
//! until Ctrl+C or SIGTERM.

use std::sync::Arc;

use hoprelay_server::{
    model::{AppState, Configuration},
    startup::{self, Bind, ServerOptions},
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    let node_name = configuration.node_name();
    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    info!(
        node = %node_name,
        persistence_mode = %configuration.persistence_mode(),
        forward_timeout = ?configuration.forward_timeout(),
        "Starting hoprelay node"
    );

    let app_state = Arc::new(AppState::from_configuration(&configuration).await?);

    info!("Starting node server on {}:{}", server_address, server_port);
    let server = startup::node_server(
        app_state,
        Bind::Address(server_address, server_port),
        ServerOptions {
            workers: configuration.server_workers(),
            shutdown_timeout: configuration.shutdown_timeout(),
        },
    )?;
    let handle = server.handle();

    let shutdown = startup::wait_for_shutdown_signal();
    let mut shutdown_rx = shutdown.subscribe();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_rx.recv() => {
            info!("Stopping node server...");
            handle.stop(true).await;
        }
    }

    info!(node = %node_name, "Hoprelay node shutdown complete");
    Ok(())
}
