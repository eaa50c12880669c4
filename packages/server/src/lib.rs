//! Kibitz relay server.
//!
//! Pairs two connections per room on the `game` channel, relays their moves,
//! and fans chat messages out to every subscriber on the `chat` channel.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
