//! Domain layer: rooms, seats, connection identities and the ports the
//! use cases depend on.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Departure, Room, RoomState, Seating};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ChatSubscriberRepository, RoomRepository};
pub use value_object::{ConnectionId, RoomId, Seat, Timestamp};
