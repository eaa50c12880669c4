//! WebSocket frame DTOs.
//!
//! Every text frame is a JSON envelope naming its logical channel:
//!
//! ```json
//! {"channel": "game", "event": "joinRoom", "data": "r1"}
//! ```
//!
//! The envelope is decoded first so that a malformed event can be answered
//! on the channel it was sent to. The `event`/`data` pair is then decoded
//! into the closed command or event enum of that channel.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

/// Decoding or encoding failure at the protocol boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("invalid {channel} event: {reason}")]
    InvalidEvent { channel: Channel, reason: String },

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Logical channel multiplexed over one WebSocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Chat,
    Game,
    /// Server-originated frames that belong to no channel
    System,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Chat => f.write_str("chat"),
            Channel::Game => f.write_str("game"),
            Channel::System => f.write_str("system"),
        }
    }
}

/// Channel-tagged frame with an undecoded `event`/`data` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub channel: Channel,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Envelope {
    /// Parse a text frame into an envelope.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))
    }

    /// Wrap a typed event for `channel`.
    pub fn wrap<E: Serialize>(channel: Channel, event: &E) -> Result<Self, ProtocolError> {
        match serde_json::to_value(event) {
            Ok(Value::Object(body)) => Ok(Self { channel, body }),
            Ok(other) => Err(ProtocolError::Encode(format!(
                "event must encode as an object, got {}",
                other
            ))),
            Err(e) => Err(ProtocolError::Encode(e.to_string())),
        }
    }

    /// Decode the body into the typed command or event of this channel.
    pub fn decode<E: DeserializeOwned>(self) -> Result<E, ProtocolError> {
        let channel = self.channel;
        serde_json::from_value(Value::Object(self.body)).map_err(|e| {
            ProtocolError::InvalidEvent {
                channel,
                reason: e.to_string(),
            }
        })
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}

/// Encode a typed event as a text frame for `channel`.
pub fn encode<E: Serialize>(channel: Channel, event: &E) -> Result<String, ProtocolError> {
    Envelope::wrap(channel, event)?.to_json()
}

// ========================================
// game channel
// ========================================

/// Client -> server events of the game channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum GameCommand {
    /// Request a seat in the room with this key
    JoinRoom(String),
    /// Relay a move to the rest of the room
    Move(MovePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub room_id: String,
    /// Opaque move, forwarded unchanged
    #[serde(rename = "move")]
    pub mv: Value,
}

/// Player color shown to clients; seat A plays white, seat B black
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedPayload {
    pub room_id: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub room_id: String,
}

/// Server -> client events of the game channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum GameEvent {
    Joined(JoinedPayload),
    RoomFull,
    AlreadySeated(RoomRef),
    StartGame,
    OpponentMove(Value),
    OpponentLeft(RoomRef),
    Error(ErrorPayload),
}

// ========================================
// chat channel
// ========================================

/// Client -> server events of the chat channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ChatCommand {
    /// Subscribe to the chat fan-out
    Connect,
    /// Unsubscribe from the chat fan-out
    Disconnect,
    /// Broadcast an arbitrary JSON object
    Chat(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedPayload {
    pub message: String,
}

/// Server -> client events of the chat channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ChatEvent {
    Connected(ConnectedPayload),
    /// Sender's payload with its connection id under `id`
    Chat(Map<String, Value>),
    Error(ErrorPayload),
}

// ========================================
// errors
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    ProtocolViolation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorPayload {
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ProtocolViolation,
            message: message.into(),
        }
    }
}

/// Server -> client events that belong to no channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum SystemEvent {
    Error(ErrorPayload),
}

// ========================================
// decoded frames
// ========================================

/// A fully decoded client -> server frame
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    Chat(ChatCommand),
    Game(GameCommand),
}

impl ClientFrame {
    /// Decode a text frame sent by a client.
    ///
    /// On failure the channel the frame was addressed to is returned along
    /// with the error, when it could be determined.
    pub fn parse(text: &str) -> Result<Self, (Option<Channel>, ProtocolError)> {
        let envelope = Envelope::parse(text).map_err(|e| (None, e))?;
        let channel = envelope.channel;
        let frame = match channel {
            Channel::Chat => envelope.decode().map(ClientFrame::Chat),
            Channel::Game => envelope.decode().map(ClientFrame::Game),
            Channel::System => Err(ProtocolError::InvalidEvent {
                channel,
                reason: "clients cannot send on the system channel".to_string(),
            }),
        };
        frame.map_err(|e| (Some(channel), e))
    }
}

/// A fully decoded server -> client frame
#[derive(Debug, Clone, PartialEq)]
pub enum ServerFrame {
    Chat(ChatEvent),
    Game(GameEvent),
    System(SystemEvent),
}

impl ServerFrame {
    /// Decode a text frame sent by the server.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let envelope = Envelope::parse(text)?;
        match envelope.channel {
            Channel::Chat => envelope.decode().map(ServerFrame::Chat),
            Channel::Game => envelope.decode().map(ServerFrame::Game),
            Channel::System => envelope.decode().map(ServerFrame::System),
        }
    }

    /// Encode this frame as text.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        match self {
            ServerFrame::Chat(event) => encode(Channel::Chat, event),
            ServerFrame::Game(event) => encode(Channel::Game, event),
            ServerFrame::System(event) => encode(Channel::System, event),
        }
    }
}

impl ClientFrame {
    /// Encode this frame as text.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        match self {
            ClientFrame::Chat(command) => encode(Channel::Chat, command),
            ClientFrame::Game(command) => encode(Channel::Game, command),
        }
    }
}
