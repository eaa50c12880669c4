//! In-memory stores. State lives for the lifetime of the process only.

pub mod chat_subscriber;
pub mod room;

pub use chat_subscriber::InMemoryChatSubscriberRepository;
pub use room::InMemoryRoomRepository;
