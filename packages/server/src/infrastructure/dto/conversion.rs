//! Conversion logic between DTOs and domain values.

use crate::domain::{RoomId, Seat};
use crate::infrastructure::dto::websocket as dto;

impl From<Seat> for dto::Color {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::A => dto::Color::White,
            Seat::B => dto::Color::Black,
        }
    }
}

impl From<dto::Color> for Seat {
    fn from(color: dto::Color) -> Self {
        match color {
            dto::Color::White => Seat::A,
            dto::Color::Black => Seat::B,
        }
    }
}

impl From<RoomId> for dto::RoomRef {
    fn from(room_id: RoomId) -> Self {
        Self {
            room_id: room_id.into_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_map_to_colors() {
        // テスト項目: 座席 A は白、座席 B は黒として公開される
        // given (前提条件):

        // when (操作):
        let a: dto::Color = Seat::A.into();
        let b: dto::Color = Seat::B.into();

        // then (期待する結果):
        assert_eq!(a, dto::Color::White);
        assert_eq!(b, dto::Color::Black);
        assert_eq!(Seat::from(dto::Color::Black), Seat::B);
    }

    #[test]
    fn test_room_id_to_room_ref() {
        // テスト項目: ルーム ID が RoomRef DTO に変換される
        // given (前提条件):
        let room_id = RoomId::new("r1");

        // when (操作):
        let room_ref: dto::RoomRef = room_id.into();

        // then (期待する結果):
        assert_eq!(room_ref.room_id, "r1");
    }
}
