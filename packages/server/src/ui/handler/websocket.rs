//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    infrastructure::dto::websocket::{
        Channel, ChatEvent, ClientFrame, ErrorPayload, GameEvent, ProtocolError, SystemEvent,
    },
    ui::state::{AppState, RelayState},
};

use super::{
    chat::{handle_chat_command, handle_chat_disconnect},
    game::{handle_game_command, handle_game_disconnect},
    send_event,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let Some(relay) = state.gateway.relay() else {
        tracing::warn!("Rejecting WebSocket upgrade: relay is not attached yet");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let connection_id = ConnectionIdFactory::generate();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, relay, connection_id)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every frame addressed to this connection, from any channel, flows through
/// this single queue, so frames arrive in the order they were queued.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this connection
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, relay: Arc<RelayState>, connection_id: ConnectionId) {
    let (tx, rx) = mpsc::unbounded_channel();
    relay
        .connect_client_usecase
        .execute(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();

    let relay_clone = relay.clone();
    let connection_id_clone = connection_id.clone();

    // Frames from one connection are handled in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id_clone, text);
                    dispatch(&relay_clone, &connection_id_clone, text.as_str()).await;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id_clone);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, stop the other
    let reader_finished = tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            true
        }
        _ = &mut send_task => false,
    };

    close_connection(
        &relay,
        &connection_id,
        (!reader_finished).then_some(recv_task),
    )
    .await;
}

/// Release everything a closed connection holds.
///
/// A still running read task is aborted and awaited first, so no frame of
/// this connection is dispatched after its seats are released.
async fn close_connection(
    relay: &RelayState,
    connection_id: &ConnectionId,
    recv_task: Option<JoinHandle<()>>,
) {
    if let Some(recv_task) = recv_task {
        recv_task.abort();
        if let Err(e) = recv_task.await
            && !e.is_cancelled()
        {
            tracing::error!("Read task of '{}' failed: {}", connection_id, e);
        }
    }

    handle_game_disconnect(relay, connection_id).await;
    handle_chat_disconnect(relay, connection_id).await;
    relay.connect_client_usecase.release(connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Decode one text frame and route it to its channel handler.
async fn dispatch(relay: &RelayState, connection_id: &ConnectionId, text: &str) {
    match ClientFrame::parse(text) {
        Ok(ClientFrame::Game(command)) => handle_game_command(relay, connection_id, command).await,
        Ok(ClientFrame::Chat(command)) => handle_chat_command(relay, connection_id, command).await,
        Err((channel, e)) => report_protocol_violation(relay, connection_id, channel, e).await,
    }
}

/// Answer a malformed frame with an error event to its sender only.
async fn report_protocol_violation(
    relay: &RelayState,
    connection_id: &ConnectionId,
    channel: Option<Channel>,
    error: ProtocolError,
) {
    tracing::warn!("Protocol violation from '{}': {}", connection_id, error);
    let payload = ErrorPayload::protocol_violation(error.to_string());
    match channel {
        Some(Channel::Game) => {
            send_event(relay, connection_id, Channel::Game, &GameEvent::Error(payload)).await
        }
        Some(Channel::Chat) => {
            send_event(relay, connection_id, Channel::Chat, &ChatEvent::Error(payload)).await
        }
        Some(Channel::System) | None => {
            send_event(
                relay,
                connection_id,
                Channel::System,
                &SystemEvent::Error(payload),
            )
            .await
        }
    }
}
