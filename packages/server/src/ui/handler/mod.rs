//! Request handlers.

mod chat;
mod game;
mod http;
mod websocket;

pub use http::{health_check, init_socket};
pub use websocket::websocket_handler;

use serde::Serialize;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{Channel, encode},
    ui::state::RelayState,
};

/// Encode an event and queue it for a single connection.
async fn send_event<E: Serialize>(
    relay: &RelayState,
    connection_id: &ConnectionId,
    channel: Channel,
    event: &E,
) {
    let json = match encode(channel, event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode {} event: {}", channel, e);
            return;
        }
    };

    if let Err(e) = relay
        .connect_client_usecase
        .notify(connection_id, &json)
        .await
    {
        tracing::warn!("Failed to send {} event to '{}': {}", channel, connection_id, e);
    }
}
