//! Infrastructure layer: in-memory stores, WebSocket delivery and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
