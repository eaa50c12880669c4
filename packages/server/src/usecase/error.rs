//! UseCase errors.

use thiserror::Error;

use crate::domain::RoomId;

/// Join refusals and failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// Both seats of the room are taken
    #[error("room '{0}' is full")]
    RoomFull(RoomId),

    /// The connection already holds a seat (in the given room)
    #[error("connection is already seated in room '{0}'")]
    AlreadySeated(RoomId),

    #[error("room directory error: {0}")]
    Directory(String),
}

/// Move relay failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayMoveError {
    /// The sender holds no seat in the target room
    #[error("connection is not seated in room '{0}'")]
    NotAMember(RoomId),

    #[error("failed to relay move: {0}")]
    BroadcastFailed(String),
}

/// Chat channel failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The sender did not subscribe to the chat channel
    #[error("connection is not subscribed to chat")]
    NotSubscribed,

    #[error("failed to deliver chat message: {0}")]
    DeliveryFailed(String),
}
