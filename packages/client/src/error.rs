//! Error types for the Kibitz client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server has not attached the relay yet (HTTP 503 on upgrade)
    #[error("Relay is not attached on the server yet")]
    RelayUnavailable,

    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established session was closed by the server or the network
    #[error("Connection lost")]
    ConnectionLost,

    /// A frame could not be encoded or decoded
    #[error("Protocol error: {0}")]
    ProtocolError(String),
}
