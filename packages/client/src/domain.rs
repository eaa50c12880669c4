//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use kibitz_server::infrastructure::dto::websocket::{Color, GameEvent, ServerFrame};

use crate::error::ClientError;

/// Seat state of this client as reported by the server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    /// Room this client is seated in
    pub room_id: Option<String>,
    /// Color assigned on join
    pub color: Option<Color>,
    /// Whether both seats of the room are taken
    pub in_game: bool,
}

impl ClientState {
    /// Apply a server frame to the local view of the seat.
    pub fn apply(&mut self, frame: &ServerFrame) {
        let ServerFrame::Game(event) = frame else {
            return;
        };

        match event {
            GameEvent::Joined(payload) => {
                self.room_id = Some(payload.room_id.clone());
                self.color = Some(payload.color);
                self.in_game = false;
            }
            GameEvent::StartGame => self.in_game = true,
            GameEvent::OpponentLeft(_) => self.in_game = false,
            _ => {}
        }
    }

    /// Prompt shown by the line editor.
    pub fn prompt(&self) -> String {
        let color = match self.color {
            Some(Color::White) => "white",
            Some(Color::Black) => "black",
            None => return "> ".to_string(),
        };
        match (&self.room_id, self.in_game) {
            (Some(room_id), true) => format!("{} ({})> ", room_id, color),
            (Some(room_id), false) => format!("{} ({}, waiting)> ", room_id, color),
            (None, _) => "> ".to_string(),
        }
    }
}

/// Check if the client should attempt to connect again.
///
/// Only failures before a session is established are retried; a lost session
/// would not get its seat back.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current attempt count (0-indexed)
/// * `max_attempts` - The maximum number of attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if !matches!(
        error,
        ClientError::RelayUnavailable | ClientError::ConnectionError(_)
    ) {
        return false;
    }

    current_attempt < max_attempts
}

/// Derive the HTTP initialization URL from the WebSocket URL.
///
/// `ws://host:port/api/socket.io` becomes `http://host:port/api/socket`.
pub fn init_url_for(ws_url: &str) -> Option<String> {
    let (scheme, rest) = ws_url.split_once("://")?;
    let http_scheme = match scheme {
        "ws" => "http",
        "wss" => "https",
        _ => return None,
    };
    let authority = rest.split('/').next().filter(|a| !a.is_empty())?;
    Some(format!("{}://{}/api/socket", http_scheme, authority))
}
