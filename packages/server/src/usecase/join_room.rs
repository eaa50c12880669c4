//! UseCase: ルームへの入室
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() と通知メソッド
//!
//! ### なぜこのテストが必要か
//! - 座席は入室順で決まり、同じルームで座席が重複してはならない
//! - 満室・多重着席の拒否はディレクトリを変更してはならない
//! - 対局開始の通知はルームが満室になった入室でのみ、両者に届く
//!
//! ### どのような状況を想定しているか
//! - 正常系：一人目（白）、二人目（黒）の入室
//! - 異常系：三人目の入室、着席中の接続による別ルームへの入室

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, RepositoryError, RoomId, RoomRepository, Seating,
};

use super::error::JoinRoomError;

/// 入室のユースケース
pub struct JoinRoomUseCase {
    /// Repository（ルームディレクトリの抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 入室を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Seating)` - 着席成功（座席と入室後のメンバー）
    /// * `Err(JoinRoomError::RoomFull)` - 満室（ディレクトリは変更されない）
    /// * `Err(JoinRoomError::AlreadySeated)` - 既に着席中（ディレクトリは変更されない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
    ) -> Result<Seating, JoinRoomError> {
        self.repository
            .seat_participant(room_id.clone(), connection_id)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomFull(_) => JoinRoomError::RoomFull(room_id),
                RepositoryError::AlreadySeated(current) => {
                    JoinRoomError::AlreadySeated(RoomId::new(current))
                }
                other => JoinRoomError::Directory(other.to_string()),
            })
    }

    /// 入室を要求した接続にだけ返信
    pub async fn reply(&self, connection_id: &ConnectionId, message: &str) -> Result<(), String> {
        self.message_pusher
            .push_to(connection_id, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 対局開始をルームの全メンバー（入室した本人を含む）にブロードキャスト
    pub async fn broadcast_session_start(
        &self,
        seating: &Seating,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(seating.participants.clone(), message)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePushError, Seat, message_pusher::MockMessagePusher},
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
    async fn test_join_assigns_seats_in_order() {
        // テスト項目: 一人目は座席 A、二人目は座席 B になり、二人目で対局開始となる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase =
            JoinRoomUseCase::new(repository.clone(), Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        let first = usecase.execute(conn("c1"), RoomId::new("r1")).await.unwrap();
        let second = usecase.execute(conn("c2"), RoomId::new("r1")).await.unwrap();

        // then (期待する結果):
        assert_eq!(first.seat, Seat::A);
        assert!(!first.starts_session());
        assert_eq!(second.seat, Seat::B);
        assert!(second.starts_session());
        assert_eq!(second.participants, vec![conn("c1"), conn("c2")]);
    }

    #[tokio::test]
    async fn test_join_full_room_is_rejected() {
        // テスト項目: 満室のルームへの入室は RoomFull になり、ディレクトリは変わらない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase =
            JoinRoomUseCase::new(repository.clone(), Arc::new(WebSocketMessagePusher::new()));
        usecase.execute(conn("c1"), RoomId::new("r1")).await.unwrap();
        usecase.execute(conn("c2"), RoomId::new("r1")).await.unwrap();

        // when (操作):
        let result = usecase.execute(conn("c3"), RoomId::new("r1")).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::RoomFull(RoomId::new("r1"))));
        let room = repository.get_room(&RoomId::new("r1")).await.unwrap();
        assert_eq!(room.participants(), vec![conn("c1"), conn("c2")]);
    }

    #[tokio::test]
    async fn test_join_while_seated_elsewhere_is_rejected() {
        // テスト項目: 別ルームに着席中の接続は AlreadySeated（着席中のルーム）で拒否される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase =
            JoinRoomUseCase::new(repository.clone(), Arc::new(WebSocketMessagePusher::new()));
        usecase.execute(conn("c1"), RoomId::new("r1")).await.unwrap();

        // when (操作):
        let result = usecase.execute(conn("c1"), RoomId::new("r2")).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::AlreadySeated(RoomId::new("r1"))));
        assert!(repository.get_room(&RoomId::new("r2")).await.is_none());
    }

    #[tokio::test]
    async fn test_broadcast_session_start_reaches_both_members() {
        // テスト項目: 対局開始の通知は入室した本人を含むルームの両メンバーに届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = JoinRoomUseCase::new(create_test_repository(), pusher.clone());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        pusher.register_client(conn("c1"), tx1).await;
        pusher.register_client(conn("c2"), tx2).await;
        pusher.register_client(conn("c3"), tx3).await;
        usecase.execute(conn("c1"), RoomId::new("r1")).await.unwrap();
        let seating = usecase.execute(conn("c2"), RoomId::new("r1")).await.unwrap();

        // when (操作):
        let result = usecase.broadcast_session_start(&seating, "start").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("start".to_string()));
        assert_eq!(rx2.recv().await, Some("start".to_string()));
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reply_reports_delivery_failure() {
        // テスト項目: 返信の送信に失敗した場合はエラー文字列が返される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(1)
            .returning(|id, _| Err(MessagePushError::ClientNotFound(id.to_string())));
        let usecase = JoinRoomUseCase::new(create_test_repository(), Arc::new(pusher));

        // when (操作):
        let result = usecase.reply(&conn("c1"), "joined").await;

        // then (期待する結果):
        assert_eq!(result, Err("client 'c1' not found".to_string()));
    }
}
