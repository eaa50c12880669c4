//! Kibitz CLI client.
//!
//! Connects to a relay server, joins a room and relays moves with the
//! opponent. Lines that are not commands are sent to the chat channel.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kibitz-client -- --room r1
//! cargo run --bin kibitz-client -- -u ws://127.0.0.1:3000/api/socket.io --no-chat
//! ```

use clap::Parser;

use kibitz_client::{ClientOptions, run_client};
use kibitz_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kibitz-client")]
#[command(about = "CLI client for the Kibitz move relay", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/api/socket.io")]
    url: String,

    /// Room to join right after connecting
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// Do not subscribe to the chat channel
    #[arg(long)]
    no_chat: bool,

    /// Do not call GET /api/socket before connecting
    #[arg(long)]
    skip_init: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("kibitz_client", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let options = ClientOptions {
        url: args.url,
        room: args.room,
        subscribe_chat: !args.no_chat,
        init_socket: !args.skip_init,
    };

    // Run the client
    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
