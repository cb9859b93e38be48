//! Group chat server.
//!
//! Serves the user/group directory over HTTP and live group sessions over
//! WebSocket. Every group keeps its most recent messages in memory.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --host 0.0.0.0 --port 3000 --history-capacity 100
//! ```

use std::sync::Arc;

use clap::Parser;
use tsudoi_server::{
    domain::DEFAULT_HISTORY_CAPACITY,
    infrastructure::{
        live::{ConnectionRegistry, GroupChannel},
        repository::InMemoryDirectory,
    },
    ui::{AppState, Server},
};
use tsudoi_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tsudoi-server")]
#[command(about = "Group chat server with live fan-out and bounded history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "TSUDOI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "TSUDOI_PORT", default_value = "8080")]
    port: u16,

    /// Number of messages kept per group
    #[arg(long, env = "TSUDOI_HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "TSUDOI_LOG_LEVEL", default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // 1. Directory (users and groups)
    let directory = Arc::new(InMemoryDirectory::new());

    // 2. Live layer: connection registry and per-group channel
    let registry = Arc::new(ConnectionRegistry::new());
    let channel = Arc::new(GroupChannel::new(
        registry,
        Arc::new(SystemClock),
        args.history_capacity,
    ));
    tracing::info!(
        "Keeping the last {} messages per group",
        channel.history_capacity()
    );

    // 3. Use cases and server
    let server = Server::new(AppState::new(directory, channel));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
