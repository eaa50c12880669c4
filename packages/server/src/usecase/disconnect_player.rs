//! UseCase: 切断時のルーム後片付け
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPlayerUseCase::execute() と相手への通知
//!
//! ### なぜこのテストが必要か
//! - 切断した接続はどのルームにも残ってはならない
//! - 空になったルームはディレクトリから削除される（空のまま残らない）
//! - 残った参加者には相手の退出が通知される
//!
//! ### どのような状況を想定しているか
//! - 正常系：満室のルームからの切断、最後の参加者の切断
//! - エッジケース：どのルームにも着席していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, MessagePusher, RoomRepository};

/// 切断処理のユースケース
pub struct DisconnectPlayerUseCase {
    /// Repository（ルームディレクトリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectPlayerUseCase {
    /// 新しい DisconnectPlayerUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// 接続の全ての着席を解除し、空になったルームを削除します。
    /// 切断は拒否されず、常に全体が適用されます。
    ///
    /// # Returns
    ///
    /// 解除された着席の一覧（着席していなければ空）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Departure> {
        let departures = self.repository.remove_participant(connection_id).await;
        for departure in &departures {
            tracing::info!(
                "Connection '{}' left room '{}' (seat {:?}, room removed: {})",
                connection_id,
                departure.room_id,
                departure.seat,
                departure.room_removed
            );
        }
        departures
    }

    /// 相手が退出したことを残りの参加者にブロードキャスト
    pub async fn broadcast_opponent_left(
        &self,
        departure: &Departure,
        message: &str,
    ) -> Result<(), String> {
        if departure.remaining.is_empty() {
            return Ok(());
        }
        self.message_pusher
            .broadcast(departure.remaining.clone(), message)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomId, Seat, message_pusher::MockMessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use kibitz_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn create_test_repository() -> Arc<InMemoryRoomRepository> {
        Arc::new(InMemoryRoomRepository::new(Arc::new(FixedClock::new(0))))
    }

    #[tokio::test]
    async fn test_disconnect_from_full_room_frees_seat_a() {
        // テスト項目: 満室のルームから座席 A が切断すると、次の入室者が座席 A を得る
        // given (前提条件):
        let repository = create_test_repository();
        repository
            .seat_participant(RoomId::new("r1"), conn("c1"))
            .await
            .unwrap();
        repository
            .seat_participant(RoomId::new("r1"), conn("c2"))
            .await
            .unwrap();
        let usecase =
            DisconnectPlayerUseCase::new(repository.clone(), Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        let departures = usecase.execute(&conn("c1")).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].remaining, vec![conn("c2")]);
        let room = repository.get_room(&RoomId::new("r1")).await.unwrap();
        assert!(!room.contains(&conn("c1")));

        let seating = repository
            .seat_participant(RoomId::new("r1"), conn("c4"))
            .await
            .unwrap();
        assert_eq!(seating.seat, Seat::A);
    }

    #[tokio::test]
    async fn test_disconnect_last_participant_removes_room() {
        // テスト項目: 最後の参加者の切断でルームがディレクトリから削除される
        // given (前提条件):
        let repository = create_test_repository();
        repository
            .seat_participant(RoomId::new("r1"), conn("c1"))
            .await
            .unwrap();
        let usecase =
            DisconnectPlayerUseCase::new(repository.clone(), Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        let departures = usecase.execute(&conn("c1")).await;

        // then (期待する結果):
        assert!(departures[0].room_removed);
        assert_eq!(repository.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_unseated_connection_is_noop() {
        // テスト項目: 着席していない接続の切断は何も変更しない
        // given (前提条件):
        let repository = create_test_repository();
        repository
            .seat_participant(RoomId::new("r1"), conn("c1"))
            .await
            .unwrap();
        let usecase =
            DisconnectPlayerUseCase::new(repository.clone(), Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        let departures = usecase.execute(&conn("c9")).await;

        // then (期待する結果):
        assert!(departures.is_empty());
        assert_eq!(repository.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_opponent_left_reaches_remaining_member() {
        // テスト項目: 退出通知は残った参加者に届く
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("c2"), tx).await;
        repository
            .seat_participant(RoomId::new("r1"), conn("c1"))
            .await
            .unwrap();
        repository
            .seat_participant(RoomId::new("r1"), conn("c2"))
            .await
            .unwrap();
        let usecase = DisconnectPlayerUseCase::new(repository, pusher);
        let departures = usecase.execute(&conn("c1")).await;

        // when (操作):
        let result = usecase
            .broadcast_opponent_left(&departures[0], "left")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("left".to_string()));
    }

    #[tokio::test]
    async fn test_opponent_left_skipped_for_removed_room() {
        // テスト項目: 残った参加者がいない場合は何も送信しない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = DisconnectPlayerUseCase::new(create_test_repository(), Arc::new(pusher));
        let departure = Departure {
            room_id: RoomId::new("r1"),
            seat: Seat::A,
            remaining: vec![],
            room_removed: true,
        };

        // when (操作):
        let result = usecase.broadcast_opponent_left(&departure, "left").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
