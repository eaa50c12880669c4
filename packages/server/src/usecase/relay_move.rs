//! UseCase: 指し手の中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMoveUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 指し手は同じルームの他のメンバーにだけ届き、送信者自身には返らない
//! - 合法手や手番の検証は行わない（中継のみ）
//!
//! ### どのような状況を想定しているか
//! - 正常系：満室のルームでの中継
//! - エッジケース：相手のいないルーム、存在しないルーム（何もしない）
//! - 異常系：着席していないルームへの送信

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RepositoryError, RoomId, RoomRepository};

use super::error::RelayMoveError;

/// 指し手中継のユースケース
pub struct RelayMoveUseCase {
    /// Repository（ルームディレクトリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMoveUseCase {
    /// 新しい RelayMoveUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 指し手の中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者の接続 ID
    /// * `room_id` - 中継先のルーム
    /// * `json_message` - 送信する JSON メッセージ（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 中継先（ルームが存在しない・相手がいない場合は空）
    /// * `Err(RelayMoveError)` - 送信者がルームに着席していない、または送信失敗
    pub async fn execute(
        &self,
        from: &ConnectionId,
        room_id: &RoomId,
        json_message: &str,
    ) -> Result<Vec<ConnectionId>, RelayMoveError> {
        let targets = match self.repository.get_opponents(room_id, from).await {
            Ok(targets) => targets,
            Err(RepositoryError::RoomNotFound(_)) => {
                tracing::debug!("Room '{}' does not exist, nothing to relay", room_id);
                return Ok(Vec::new());
            }
            Err(_) => return Err(RelayMoveError::NotAMember(room_id.clone())),
        };

        if targets.is_empty() {
            tracing::debug!("Room '{}' has no opponent yet, nothing to relay", room_id);
            return Ok(targets);
        }

        self.message_pusher
            .broadcast(targets.clone(), json_message)
            .await
            .map_err(|e| RelayMoveError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }
}
