//! Game channel handlers: join, move relay and disconnect cleanup.

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::websocket::{
        Channel, GameCommand, GameEvent, JoinedPayload, MovePayload, encode,
    },
    ui::state::RelayState,
    usecase::{JoinRoomError, RelayMoveError},
};

pub async fn handle_game_command(
    relay: &RelayState,
    connection_id: &ConnectionId,
    command: GameCommand,
) {
    match command {
        GameCommand::JoinRoom(room_id) => join_room(relay, connection_id, RoomId::new(room_id)).await,
        GameCommand::Move(payload) => relay_move(relay, connection_id, payload).await,
    }
}

async fn join_room(relay: &RelayState, connection_id: &ConnectionId, room_id: RoomId) {
    let reply = match relay
        .join_room_usecase
        .execute(connection_id.clone(), room_id.clone())
        .await
    {
        Ok(seating) => {
            tracing::info!(
                "Connection '{}' seated at {:?} in room '{}'",
                connection_id,
                seating.seat,
                seating.room_id
            );
            let joined = GameEvent::Joined(JoinedPayload {
                room_id: seating.room_id.as_str().to_string(),
                color: seating.seat.into(),
            });
            reply_to(relay, connection_id, &joined).await;

            if seating.starts_session() {
                match encode(Channel::Game, &GameEvent::StartGame) {
                    Ok(json) => {
                        if let Err(e) = relay
                            .join_room_usecase
                            .broadcast_session_start(&seating, &json)
                            .await
                        {
                            tracing::warn!("Failed to broadcast startGame: {}", e);
                        } else {
                            tracing::info!("Room '{}' is now active", seating.room_id);
                        }
                    }
                    Err(e) => tracing::error!("Failed to encode startGame: {}", e),
                }
            }
            return;
        }
        Err(JoinRoomError::RoomFull(_)) => {
            tracing::info!("Room '{}' is full, rejecting '{}'", room_id, connection_id);
            GameEvent::RoomFull
        }
        Err(JoinRoomError::AlreadySeated(current)) => {
            tracing::info!(
                "Connection '{}' is already seated in room '{}'",
                connection_id,
                current
            );
            GameEvent::AlreadySeated(current.into())
        }
        Err(e) => {
            tracing::error!("Join of '{}' into '{}' failed: {}", connection_id, room_id, e);
            return;
        }
    };

    reply_to(relay, connection_id, &reply).await;
}

async fn reply_to(relay: &RelayState, connection_id: &ConnectionId, event: &GameEvent) {
    let json = match encode(Channel::Game, event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode game event: {}", e);
            return;
        }
    };
    if let Err(e) = relay.join_room_usecase.reply(connection_id, &json).await {
        tracing::warn!("Failed to reply to '{}': {}", connection_id, e);
    }
}

async fn relay_move(relay: &RelayState, connection_id: &ConnectionId, payload: MovePayload) {
    let room_id = RoomId::new(payload.room_id);
    let json = match encode(Channel::Game, &GameEvent::OpponentMove(payload.mv)) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode opponentMove: {}", e);
            return;
        }
    };

    match relay
        .relay_move_usecase
        .execute(connection_id, &room_id, &json)
        .await
    {
        Ok(targets) => {
            tracing::debug!(
                "Relayed move from '{}' in room '{}' to {} connection(s)",
                connection_id,
                room_id,
                targets.len()
            );
        }
        Err(RelayMoveError::NotAMember(room_id)) => {
            tracing::warn!(
                "Ignoring move from '{}': not seated in room '{}'",
                connection_id,
                room_id
            );
        }
        Err(e) => tracing::warn!("Failed to relay move: {}", e),
    }
}

/// Release every seat held by a closed connection and tell the opponents.
pub async fn handle_game_disconnect(relay: &RelayState, connection_id: &ConnectionId) {
    let departures = relay.disconnect_player_usecase.execute(connection_id).await;
    for departure in departures {
        if departure.remaining.is_empty() {
            continue;
        }
        let event = GameEvent::OpponentLeft(departure.room_id.clone().into());
        let json = match encode(Channel::Game, &event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode opponentLeft: {}", e);
                continue;
            }
        };
        if let Err(e) = relay
            .disconnect_player_usecase
            .broadcast_opponent_left(&departure, &json)
            .await
        {
            tracing::warn!("Failed to broadcast opponentLeft: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::{Color, RoomRef, ServerFrame},
        ui::state::test_support::{connect, create_test_relay, drain},
    };
    use serde_json::json;

    fn game_events(frames: Vec<String>) -> Vec<GameEvent> {
        frames
            .into_iter()
            .map(|frame| match ServerFrame::parse(&frame).unwrap() {
                ServerFrame::Game(event) => event,
                other => panic!("unexpected frame: {:?}", other),
            })
            .collect()
    }

    fn joined(room_id: &str, color: Color) -> GameEvent {
        GameEvent::Joined(JoinedPayload {
            room_id: room_id.to_string(),
            color,
        })
    }

    #[tokio::test]
    async fn test_two_joins_then_full_room() {
        // テスト項目: 二人の入室で白・黒が割り当てられ対局開始、三人目は roomFull のみ
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, mut rx1) = connect(&pusher, "c1").await;
        let (c2, mut rx2) = connect(&pusher, "c2").await;
        let (c3, mut rx3) = connect(&pusher, "c3").await;

        // when (操作):
        handle_game_command(&relay, &c1, GameCommand::JoinRoom("r1".to_string())).await;
        handle_game_command(&relay, &c2, GameCommand::JoinRoom("r1".to_string())).await;
        handle_game_command(&relay, &c3, GameCommand::JoinRoom("r1".to_string())).await;

        // then (期待する結果):
        assert_eq!(
            game_events(drain(&mut rx1)),
            vec![joined("r1", Color::White), GameEvent::StartGame]
        );
        assert_eq!(
            game_events(drain(&mut rx2)),
            vec![joined("r1", Color::Black), GameEvent::StartGame]
        );
        assert_eq!(game_events(drain(&mut rx3)), vec![GameEvent::RoomFull]);
    }

    #[tokio::test]
    async fn test_second_join_while_seated_is_refused() {
        // テスト項目: 着席中の接続が別のルームに入室すると alreadySeated が返る
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, mut rx1) = connect(&pusher, "c1").await;
        handle_game_command(&relay, &c1, GameCommand::JoinRoom("r1".to_string())).await;
        drain(&mut rx1);

        // when (操作):
        handle_game_command(&relay, &c1, GameCommand::JoinRoom("r2".to_string())).await;

        // then (期待する結果):
        assert_eq!(
            game_events(drain(&mut rx1)),
            vec![GameEvent::AlreadySeated(RoomRef {
                room_id: "r1".to_string()
            })]
        );
    }

    #[tokio::test]
    async fn test_move_is_relayed_to_opponent_only() {
        // テスト項目: 指し手はそのまま相手にだけ opponentMove として届く
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, mut rx1) = connect(&pusher, "c1").await;
        let (c2, mut rx2) = connect(&pusher, "c2").await;
        handle_game_command(&relay, &c1, GameCommand::JoinRoom("r1".to_string())).await;
        handle_game_command(&relay, &c2, GameCommand::JoinRoom("r1".to_string())).await;
        drain(&mut rx1);
        drain(&mut rx2);

        // when (操作):
        let mv = json!({"from": "e2", "to": "e4"});
        handle_game_command(
            &relay,
            &c1,
            GameCommand::Move(MovePayload {
                room_id: "r1".to_string(),
                mv: mv.clone(),
            }),
        )
        .await;

        // then (期待する結果):
        assert!(drain(&mut rx1).is_empty());
        assert_eq!(game_events(drain(&mut rx2)), vec![GameEvent::OpponentMove(mv)]);
    }

    #[tokio::test]
    async fn test_disconnect_notifies_opponent_and_frees_seat() {
        // テスト項目: 切断で相手に opponentLeft が届き、次の入室者は白になる
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, _rx1) = connect(&pusher, "c1").await;
        let (c2, mut rx2) = connect(&pusher, "c2").await;
        let (c4, mut rx4) = connect(&pusher, "c4").await;
        handle_game_command(&relay, &c1, GameCommand::JoinRoom("r1".to_string())).await;
        handle_game_command(&relay, &c2, GameCommand::JoinRoom("r1".to_string())).await;
        drain(&mut rx2);

        // when (操作):
        handle_game_disconnect(&relay, &c1).await;
        handle_game_command(&relay, &c4, GameCommand::JoinRoom("r1".to_string())).await;

        // then (期待する結果):
        let to_c2 = game_events(drain(&mut rx2));
        assert_eq!(
            to_c2,
            vec![
                GameEvent::OpponentLeft(RoomRef {
                    room_id: "r1".to_string()
                }),
                GameEvent::StartGame,
            ]
        );
        assert_eq!(
            game_events(drain(&mut rx4)),
            vec![joined("r1", Color::White), GameEvent::StartGame]
        );
    }
}
