//! Watch-party sync server.
//!
//! Keeps one authoritative playback state per room and relays control actions
//! and cursor positions between the participants of each room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-server
//! PORT=4000 cargo run --bin watchparty-server
//! cargo run --bin watchparty-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tokio::sync::Mutex;
use watchparty_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server},
};
use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-server")]
#[command(about = "Watch-party room sync server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&["watchparty_server", "tower_http"], "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository (room registry)
    // 2. MessagePusher
    // 3. AppState (use cases)
    // 4. Server

    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));
    let state = AppState::new(repository, message_pusher);

    let port = args.port;
    if let Err(e) = Server::new(state).run(args.host, port).await {
        if e.is_addr_in_use() {
            tracing::error!(
                "Port {} is already in use. Try a different PORT or stop the process that is using it.",
                port
            );
        }
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
