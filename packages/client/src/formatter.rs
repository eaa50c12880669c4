//! Message formatting utilities for client display.

use kibitz_server::infrastructure::dto::websocket::{
    ChatEvent, Color, ErrorPayload, GameEvent, ServerFrame, SystemEvent,
};
use kibitz_shared::time::timestamp_to_clock_time;
use serde_json::{Map, Value};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a decoded server frame
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame received from the server
    /// * `received_at` - Unix timestamp when the frame was received (milliseconds)
    pub fn format_frame(frame: &ServerFrame, received_at: i64) -> String {
        let time = timestamp_to_clock_time(received_at);
        match frame {
            ServerFrame::Chat(event) => Self::format_chat_event(event, &time),
            ServerFrame::Game(event) => Self::format_game_event(event, &time),
            ServerFrame::System(SystemEvent::Error(payload)) => Self::format_error(payload, &time),
        }
    }

    fn format_chat_event(event: &ChatEvent, time: &str) -> String {
        match event {
            ChatEvent::Connected(payload) => format!("\n[{}] * {}\n", time, payload.message),
            ChatEvent::Chat(payload) => Self::format_chat_message(payload, time),
            ChatEvent::Error(payload) => Self::format_error(payload, time),
        }
    }

    fn format_game_event(event: &GameEvent, time: &str) -> String {
        match event {
            GameEvent::Joined(payload) => format!(
                "\n[{}] * joined room '{}' as {}\n",
                time,
                payload.room_id,
                color_name(payload.color)
            ),
            GameEvent::RoomFull => format!("\n[{}] * room is full\n", time),
            GameEvent::AlreadySeated(room) => {
                format!("\n[{}] * already seated in room '{}'\n", time, room.room_id)
            }
            GameEvent::StartGame => format!(
                "\n\n============================================================\n\
                 [{}] game started\n\
                 ============================================================\n",
                time
            ),
            GameEvent::OpponentMove(mv) => {
                format!("\n[{}] opponent played {}\n", time, display_value(mv))
            }
            GameEvent::OpponentLeft(room) => {
                format!("\n[{}] * opponent left room '{}'\n", time, room.room_id)
            }
            GameEvent::Error(payload) => Self::format_error(payload, time),
        }
    }

    /// Format a chat message
    ///
    /// The `text` field is shown when present, otherwise the whole payload.
    fn format_chat_message(payload: &Map<String, Value>, time: &str) -> String {
        let from = payload
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let content = match payload.get("text") {
            Some(text) => display_value(text),
            None => {
                let mut rest = payload.clone();
                rest.remove("id");
                Value::Object(rest).to_string()
            }
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             received at {}\n\
             ------------------------------------------------------------\n",
            from, content, time
        )
    }

    fn format_error(payload: &ErrorPayload, time: &str) -> String {
        format!("\n[{}] ! server rejected the last frame: {}\n", time, payload.message)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

/// Strings are shown without quotes, anything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kibitz_server::infrastructure::dto::websocket::{JoinedPayload, RoomRef};
    use serde_json::json;

    // 1970-01-01T00:00:05Z
    const RECEIVED_AT: i64 = 5_000;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_format_joined() {
        // テスト項目: 入室通知にルーム名と色が表示される
        // given (前提条件):
        let frame = ServerFrame::Game(GameEvent::Joined(JoinedPayload {
            room_id: "r1".to_string(),
            color: Color::White,
        }));

        // when (操作):
        let result = MessageFormatter::format_frame(&frame, RECEIVED_AT);

        // then (期待する結果):
        assert_eq!(result, "\n[00:00:05] * joined room 'r1' as white\n");
    }

    #[test]
    fn test_format_opponent_move() {
        // テスト項目: 文字列の指し手は引用符なし、それ以外は JSON で表示される
        // given (前提条件):
        let text_move = ServerFrame::Game(GameEvent::OpponentMove(json!("e7e5")));
        let json_move = ServerFrame::Game(GameEvent::OpponentMove(json!({"to": "e5"})));

        // when (操作):
        let text_result = MessageFormatter::format_frame(&text_move, RECEIVED_AT);
        let json_result = MessageFormatter::format_frame(&json_move, RECEIVED_AT);

        // then (期待する結果):
        assert_eq!(text_result, "\n[00:00:05] opponent played e7e5\n");
        assert_eq!(json_result, "\n[00:00:05] opponent played {\"to\":\"e5\"}\n");
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットは送信者の id と本文で表示される
        // given (前提条件):
        let frame = ServerFrame::Chat(ChatEvent::Chat(object(
            json!({"id": "c1", "text": "hello"}),
        )));

        // when (操作):
        let result = MessageFormatter::format_frame(&frame, RECEIVED_AT);

        // then (期待する結果):
        assert!(result.contains("@c1: hello\n"));
        assert!(result.contains("received at 00:00:05\n"));
    }

    #[test]
    fn test_format_chat_message_without_text() {
        // テスト項目: text を持たないチャットは id を除いたペイロードが表示される
        // given (前提条件):
        let frame = ServerFrame::Chat(ChatEvent::Chat(object(
            json!({"id": "c2", "emoji": "+1"}),
        )));

        // when (操作):
        let result = MessageFormatter::format_frame(&frame, RECEIVED_AT);

        // then (期待する結果):
        assert!(result.contains("@c2: {\"emoji\":\"+1\"}\n"));
    }

    #[test]
    fn test_format_opponent_left_and_error() {
        // テスト項目: 相手の退出とエラーが表示される
        // given (前提条件):
        let left = ServerFrame::Game(GameEvent::OpponentLeft(RoomRef {
            room_id: "r1".to_string(),
        }));
        let error = ServerFrame::System(SystemEvent::Error(ErrorPayload::protocol_violation(
            "malformed frame",
        )));

        // when (操作):
        let left_result = MessageFormatter::format_frame(&left, RECEIVED_AT);
        let error_result = MessageFormatter::format_frame(&error, RECEIVED_AT);

        // then (期待する結果):
        assert_eq!(left_result, "\n[00:00:05] * opponent left room 'r1'\n");
        assert_eq!(
            error_result,
            "\n[00:00:05] ! server rejected the last frame: malformed frame\n"
        );
    }

    #[test]
    fn test_format_raw_and_binary() {
        // テスト項目: 解釈できないフレームとバイナリがそのまま表示される
        // given (前提条件):
        let text = "hello";

        // when (操作):
        let raw = MessageFormatter::format_raw_message(text);
        let binary = MessageFormatter::format_binary_message(3);

        // then (期待する結果):
        assert_eq!(raw, "\n← Received: hello\n");
        assert_eq!(binary, "\n← Received 3 bytes of binary data\n");
    }
}
