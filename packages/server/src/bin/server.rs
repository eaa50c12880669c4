//! Kibitz relay server.
//!
//! Pairs players into two-seat rooms and relays their moves, with a side chat
//! channel, over a single WebSocket per client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kibitz-server
//! cargo run --bin kibitz-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin kibitz-server -- --attach-on-startup false
//! ```

use std::sync::Arc;

use clap::Parser;
use kibitz_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryChatSubscriberRepository, InMemoryRoomRepository},
    },
    ui::{RelayState, Server},
};
use kibitz_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kibitz-server")]
#[command(about = "Two-seat move relay with a side chat channel", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Attach the relay right after binding instead of on the first GET /api/socket
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    attach_on_startup: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("kibitz_server", env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repositories (in-memory)
    let room_repository = Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock)));
    let chat_subscribers = Arc::new(InMemoryChatSubscriberRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let relay = Arc::new(RelayState::new(
        room_repository,
        chat_subscribers,
        message_pusher,
    ));

    // 4. Create and run the server
    let server = Server::new(relay, args.attach_on_startup);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
