//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, Departure, RepositoryError, Room, RoomId, Seating};

/// Room directory
///
/// ルーム ID から参加者（最大 2 名）への対応を保持するディレクトリ。
/// 各メソッドは 1 回の排他区間で完結し、読み取りと更新の間に他の操作が割り込まない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 参加者を着席させる
    ///
    /// ルームが存在しなければ作成する。満室なら `RoomFull`、
    /// 接続が既にどこかのルームに着席していれば `AlreadySeated` を返し、何も変更しない。
    async fn seat_participant(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
    ) -> Result<Seating, RepositoryError>;

    /// 指定した接続以外のルームメンバーを取得
    ///
    /// ルームが存在しなければ `RoomNotFound`、接続がメンバーでなければ `NotAMember`。
    async fn get_opponents(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, RepositoryError>;

    /// 接続の全ての着席を解除し、空になったルームを削除
    async fn remove_participant(&self, connection_id: &ConnectionId) -> Vec<Departure>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 接続が着席しているルーム ID を取得
    async fn find_room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// ディレクトリ内のルーム数を取得
    async fn count_rooms(&self) -> usize;
}

/// Chat subscriber registry
///
/// チャットチャンネルの購読者集合。ルームの状態とは独立している。
#[async_trait]
pub trait ChatSubscriberRepository: Send + Sync {
    /// 購読者を追加（新規追加なら true）
    async fn add_subscriber(&self, connection_id: ConnectionId) -> bool;

    /// 購読者を削除（削除したなら true）
    async fn remove_subscriber(&self, connection_id: &ConnectionId) -> bool;

    /// 現在の購読者を全て取得
    async fn get_subscribers(&self) -> Vec<ConnectionId>;
}
