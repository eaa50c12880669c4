//! UseCase: チャットのブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastChatUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - チャットは送信者を含む全ての購読者に届く（ルームとは無関係）
//! - 購読していない接続からの送信は配信されない
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数購読者への配信
//! - 異常系：未購読の接続からの送信

use std::sync::Arc;

use crate::domain::{ChatSubscriberRepository, ConnectionId, MessagePusher};

use super::error::ChatError;

/// チャットブロードキャストのユースケース
pub struct BroadcastChatUseCase {
    /// Repository（購読者集合の抽象化）
    subscribers: Arc<dyn ChatSubscriberRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastChatUseCase {
    /// 新しい BroadcastChatUseCase を作成
    pub fn new(
        subscribers: Arc<dyn ChatSubscriberRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            subscribers,
            message_pusher,
        }
    }

    /// ブロードキャストを実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者の接続 ID（購読済みであること）
    /// * `json_message` - 送信する JSON メッセージ（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 配信対象（送信者を含む）
    /// * `Err(ChatError)` - 未購読、または送信失敗
    pub async fn execute(
        &self,
        from: &ConnectionId,
        json_message: &str,
    ) -> Result<Vec<ConnectionId>, ChatError> {
        let targets = self.subscribers.get_subscribers().await;
        if !targets.contains(from) {
            return Err(ChatError::NotSubscribed);
        }

        self.message_pusher
            .broadcast(targets.clone(), json_message)
            .await
            .map_err(|e| ChatError::DeliveryFailed(e.to_string()))?;

        Ok(targets)
    }
}
