//! Draw-and-guess Game Server - Entry Point
//!
//! Loads configuration, starts the GameServer actor and accepts connections.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sketch_server::{serve, Config, GameServer};

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=sketch_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sketch_server=info")),
        )
        .init();

    let mut config = Config::from_env()?;

    // Bind address from command line overrides HOST/PORT
    if let Some(addr) = env::args().nth(1) {
        config.bind_addr = addr;
    }

    // Start TCP listener
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "Game server listening on {} (round: {:?}, origins: {:?})",
        config.bind_addr, config.round_duration, config.allowed_origins
    );

    // Create GameServer actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let server = GameServer::new(cmd_rx, cmd_tx.downgrade(), config.round_duration);
    tokio::spawn(server.run());

    info!("GameServer actor started");

    // Connection accept loop
    serve(listener, cmd_tx, Arc::new(config.allowed_origins)).await;

    Ok(())
}
