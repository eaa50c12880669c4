//! UseCase: チャットチャンネルの購読
//!
//! 購読は接続単位で、ルームの状態とは独立しています。

use std::sync::Arc;

use crate::domain::{ChatSubscriberRepository, ConnectionId, MessagePusher};

use super::error::ChatError;

/// チャット購読のユースケース
pub struct SubscribeChatUseCase {
    /// Repository（購読者集合の抽象化）
    subscribers: Arc<dyn ChatSubscriberRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SubscribeChatUseCase {
    /// 新しい SubscribeChatUseCase を作成
    pub fn new(
        subscribers: Arc<dyn ChatSubscriberRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            subscribers,
            message_pusher,
        }
    }

    /// 購読を実行し、新規購読者にだけ接続確認を送信
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 新規に購読した（確認を送信した）
    /// * `Ok(false)` - 既に購読済み（何も送信しない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        acknowledgement: &str,
    ) -> Result<bool, ChatError> {
        if !self.subscribers.add_subscriber(connection_id.clone()).await {
            return Ok(false);
        }

        self.message_pusher
            .push_to(&connection_id, acknowledgement)
            .await
            .map_err(|e| ChatError::DeliveryFailed(e.to_string()))?;

        Ok(true)
    }

    /// 購読を解除
    pub async fn unsubscribe(&self, connection_id: &ConnectionId) -> bool {
        self.subscribers.remove_subscriber(connection_id).await
    }
}
