//! Headless watch-party participant with reconnection support.
//!
//! Joins a room, keeps a simulated player in sync with the other participants
//! and sends control actions typed at the prompt (`/help` lists them).
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-client -- --room movie-night --name alice
//! cargo run --bin watchparty-client -- -r movie-night -n bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-client")]
#[command(about = "Watch-party participant that keeps a simulated player in sync", long_about = None)]
struct Args {
    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// Display name shown to the other participants
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&["watchparty_client"], "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = watchparty_client::run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
