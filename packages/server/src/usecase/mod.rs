//! UseCase 層
//!
//! 1 操作 = 1 ユースケース。各ユースケースは domain 層の trait
//! （`RoomRepository`, `ChatSubscriberRepository`, `MessagePusher`）にのみ依存します。

mod broadcast_chat;
mod connect_client;
mod disconnect_player;
mod error;
mod join_room;
mod relay_move;
mod subscribe_chat;

pub use broadcast_chat::BroadcastChatUseCase;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_player::DisconnectPlayerUseCase;
pub use error::{ChatError, JoinRoomError, RelayMoveError};
pub use join_room::JoinRoomUseCase;
pub use relay_move::RelayMoveUseCase;
pub use subscribe_chat::SubscribeChatUseCase;
