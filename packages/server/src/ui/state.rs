//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    domain::{ChatSubscriberRepository, MessagePusher, RoomRepository},
    usecase::{
        BroadcastChatUseCase, ConnectClientUseCase, DisconnectPlayerUseCase, JoinRoomUseCase,
        RelayMoveUseCase, SubscribeChatUseCase,
    },
};

use super::gateway::Gateway;

/// Relay handlers for the chat and game channels
pub struct RelayState {
    /// ConnectClientUseCase（接続登録のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// JoinRoomUseCase（入室のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// RelayMoveUseCase（指し手中継のユースケース）
    pub relay_move_usecase: Arc<RelayMoveUseCase>,
    /// DisconnectPlayerUseCase（切断処理のユースケース）
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    /// SubscribeChatUseCase（チャット購読のユースケース）
    pub subscribe_chat_usecase: Arc<SubscribeChatUseCase>,
    /// BroadcastChatUseCase（チャットブロードキャストのユースケース）
    pub broadcast_chat_usecase: Arc<BroadcastChatUseCase>,
}

impl RelayState {
    /// Wire every use case to the given repositories and pusher.
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        chat_subscribers: Arc<dyn ChatSubscriberRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
            )),
            relay_move_usecase: Arc::new(RelayMoveUseCase::new(
                room_repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_player_usecase: Arc::new(DisconnectPlayerUseCase::new(
                room_repository,
                message_pusher.clone(),
            )),
            subscribe_chat_usecase: Arc::new(SubscribeChatUseCase::new(
                chat_subscribers.clone(),
                message_pusher.clone(),
            )),
            broadcast_chat_usecase: Arc::new(BroadcastChatUseCase::new(
                chat_subscribers,
                message_pusher,
            )),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub gateway: Gateway,
}
