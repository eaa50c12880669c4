//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 排他制御
//!
//! ルームの対応表と「接続 → 着席中のルーム」の逆引きインデックスは
//! 一つの `Mutex` で保護します。各 trait メソッドはロックを一度だけ取得し、
//! 読み取りから更新までを同じ排他区間で行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use kibitz_shared::time::{Clock, timestamp_to_rfc3339};
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Departure, RepositoryError, Room, RoomError, RoomId, RoomRepository, Seating,
    Timestamp,
};

/// ルーム対応表と逆引きインデックス
#[derive(Default)]
struct Directory {
    /// Key: ルーム ID, Value: 参加者が 1 名以上いるルーム
    rooms: HashMap<RoomId, Room>,
    /// Key: 接続 ID, Value: その接続が着席しているルーム ID
    seated: HashMap<ConnectionId, RoomId>,
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    directory: Mutex<Directory>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    ///
    /// `clock` はルームの作成時刻と寿命のログに使用します。
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            directory: Mutex::new(Directory::default()),
            clock,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn seat_participant(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
    ) -> Result<Seating, RepositoryError> {
        let mut guard = self.directory.lock().await;
        let directory = &mut *guard;

        if let Some(current) = directory.seated.get(&connection_id) {
            return Err(RepositoryError::AlreadySeated(current.as_str().to_string()));
        }

        let created_at = Timestamp::new(self.clock.now_millis());
        let room = directory
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::debug!("Room '{}' created", room_id);
                Room::new(room_id.clone(), created_at)
            });

        let seat = room.seat(connection_id.clone()).map_err(|e| match e {
            RoomError::CapacityExceeded => RepositoryError::RoomFull(room_id.as_str().to_string()),
            RoomError::AlreadySeated => {
                RepositoryError::AlreadySeated(room_id.as_str().to_string())
            }
        })?;
        let participants = room.participants();

        directory.seated.insert(connection_id, room_id.clone());

        Ok(Seating {
            room_id,
            seat,
            participants,
        })
    }

    async fn get_opponents(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, RepositoryError> {
        let directory = self.directory.lock().await;
        let room = directory
            .rooms
            .get(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;

        if !room.contains(connection_id) {
            return Err(RepositoryError::NotAMember(room_id.as_str().to_string()));
        }

        Ok(room.opponents_of(connection_id))
    }

    async fn remove_participant(&self, connection_id: &ConnectionId) -> Vec<Departure> {
        let mut guard = self.directory.lock().await;
        let directory = &mut *guard;

        let Some(room_id) = directory.seated.remove(connection_id) else {
            return Vec::new();
        };
        let Some(room) = directory.rooms.get_mut(&room_id) else {
            tracing::warn!(
                "Connection '{}' was indexed under missing room '{}'",
                connection_id,
                room_id
            );
            return Vec::new();
        };
        let Some(seat) = room.vacate(connection_id) else {
            tracing::warn!(
                "Connection '{}' was indexed under room '{}' without a seat",
                connection_id,
                room_id
            );
            return Vec::new();
        };

        let remaining = room.participants();
        let room_removed = room.is_empty();
        if room_removed && let Some(room) = directory.rooms.remove(&room_id) {
            let lifetime = self.clock.now_millis() - room.created_at.value();
            tracing::debug!(
                "Room '{}' created at {} removed after {} ms",
                room_id,
                timestamp_to_rfc3339(room.created_at.value()),
                lifetime
            );
        }

        vec![Departure {
            room_id,
            seat,
            remaining,
            room_removed,
        }]
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let directory = self.directory.lock().await;
        directory.rooms.get(room_id).cloned()
    }

    async fn find_room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let directory = self.directory.lock().await;
        directory.seated.get(connection_id).cloned()
    }

    async fn count_rooms(&self) -> usize {
        let directory = self.directory.lock().await;
        directory.rooms.len()
    }
}
