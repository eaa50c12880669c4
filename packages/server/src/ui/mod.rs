//! Relay server: HTTP routes, WebSocket handlers and the connection gateway.

mod gateway;
mod handler;
mod server;
mod signal;
pub mod state;

pub use gateway::{AttachStatus, Gateway, GatewayError};
pub use server::{SOCKET_PATH, Server};
pub use state::{AppState, RelayState};
