//! Domain errors.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,
}

/// Room entity errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Both seats are taken
    #[error("room is full")]
    CapacityExceeded,

    /// The connection already holds a seat in this room
    #[error("connection is already seated in this room")]
    AlreadySeated,
}

/// Room directory errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error("connection is already seated in room '{0}'")]
    AlreadySeated(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection is not a member of room '{0}'")]
    NotAMember(String),
}

/// Message delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
