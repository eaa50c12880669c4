//! Data Transfer Objects.
//!
//! - `websocket`: frames exchanged over the relay WebSocket
//! - `conversion`: domain <-> DTO conversions

pub mod conversion;
pub mod websocket;
