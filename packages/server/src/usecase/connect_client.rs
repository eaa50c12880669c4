//! UseCase: 接続の登録・解除
//!
//! WebSocket 接続ごとの送信キューを MessagePusher に登録します。
//! チャットとゲームのどちらのチャンネルも、この登録を経由して接続に送信します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続登録のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続の送信キューを登録
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
    }

    /// 接続に直接送信（プロトコル違反の通知など）
    pub async fn notify(&self, connection_id: &ConnectionId, message: &str) -> Result<(), String> {
        self.message_pusher
            .push_to(connection_id, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 接続の送信キューを登録解除
    pub async fn release(&self, connection_id: &ConnectionId) {
        self.message_pusher.unregister_client(connection_id).await;
    }
}
