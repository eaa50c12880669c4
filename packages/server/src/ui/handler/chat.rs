//! Chat channel handlers.

use serde_json::{Map, Value};

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{Channel, ChatCommand, ChatEvent, ConnectedPayload, encode},
    ui::state::RelayState,
    usecase::ChatError,
};

/// Acknowledgement text sent to a new chat subscriber
pub const CONNECTED_MESSAGE: &str = "Connected to chat";

pub async fn handle_chat_command(
    relay: &RelayState,
    connection_id: &ConnectionId,
    command: ChatCommand,
) {
    match command {
        ChatCommand::Connect => subscribe(relay, connection_id).await,
        ChatCommand::Disconnect => {
            if relay.subscribe_chat_usecase.unsubscribe(connection_id).await {
                tracing::info!("Connection '{}' unsubscribed from chat", connection_id);
            }
        }
        ChatCommand::Chat(payload) => broadcast(relay, connection_id, payload).await,
    }
}

async fn subscribe(relay: &RelayState, connection_id: &ConnectionId) {
    let ack = ChatEvent::Connected(ConnectedPayload {
        message: CONNECTED_MESSAGE.to_string(),
    });
    let json = match encode(Channel::Chat, &ack) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode connected: {}", e);
            return;
        }
    };

    match relay
        .subscribe_chat_usecase
        .execute(connection_id.clone(), &json)
        .await
    {
        Ok(true) => tracing::info!("Connection '{}' subscribed to chat", connection_id),
        Ok(false) => tracing::debug!("Connection '{}' is already subscribed", connection_id),
        Err(e) => tracing::warn!("Failed to acknowledge '{}': {}", connection_id, e),
    }
}

async fn broadcast(relay: &RelayState, connection_id: &ConnectionId, payload: Map<String, Value>) {
    let event = ChatEvent::Chat(tag_with_sender(connection_id, payload));
    let json = match encode(Channel::Chat, &event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to encode chat: {}", e);
            return;
        }
    };

    match relay
        .broadcast_chat_usecase
        .execute(connection_id, &json)
        .await
    {
        Ok(targets) => tracing::debug!(
            "Broadcasted chat from '{}' to {} subscriber(s)",
            connection_id,
            targets.len()
        ),
        Err(ChatError::NotSubscribed) => tracing::warn!(
            "Ignoring chat from '{}': not subscribed",
            connection_id
        ),
        Err(e) => tracing::warn!("Failed to broadcast chat: {}", e),
    }
}

/// Add the sender's id to a chat payload. The server's id wins over any
/// `id` the client supplied.
fn tag_with_sender(connection_id: &ConnectionId, mut payload: Map<String, Value>) -> Map<String, Value> {
    payload.insert(
        "id".to_string(),
        Value::String(connection_id.as_str().to_string()),
    );
    payload
}

/// Unsubscribe a closed connection.
pub async fn handle_chat_disconnect(relay: &RelayState, connection_id: &ConnectionId) {
    relay.subscribe_chat_usecase.unsubscribe(connection_id).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::ServerFrame,
        ui::state::test_support::{connect, create_test_relay, drain},
    };
    use serde_json::json;

    fn chat_events(frames: Vec<String>) -> Vec<ChatEvent> {
        frames
            .into_iter()
            .map(|frame| match ServerFrame::parse(&frame).unwrap() {
                ServerFrame::Chat(event) => event,
                other => panic!("unexpected frame: {:?}", other),
            })
            .collect()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_acknowledges_subscriber_only() {
        // テスト項目: connect の確認は購読した本人にだけ届く
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, mut rx1) = connect(&pusher, "c1").await;
        let (_c2, mut rx2) = connect(&pusher, "c2").await;

        // when (操作):
        handle_chat_command(&relay, &c1, ChatCommand::Connect).await;

        // then (期待する結果):
        assert_eq!(
            chat_events(drain(&mut rx1)),
            vec![ChatEvent::Connected(ConnectedPayload {
                message: CONNECTED_MESSAGE.to_string()
            })]
        );
        assert!(drain(&mut rx2).is_empty());
    }

    #[tokio::test]
    async fn test_chat_fans_out_with_sender_id() {
        // テスト項目: チャットは送信者を含む全購読者に id 付きで届き、未購読者には届かない
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, mut rx1) = connect(&pusher, "c1").await;
        let (c2, mut rx2) = connect(&pusher, "c2").await;
        let (_c3, mut rx3) = connect(&pusher, "c3").await;
        handle_chat_command(&relay, &c1, ChatCommand::Connect).await;
        handle_chat_command(&relay, &c2, ChatCommand::Connect).await;
        drain(&mut rx1);
        drain(&mut rx2);

        // when (操作):
        handle_chat_command(
            &relay,
            &c1,
            ChatCommand::Chat(object(json!({"text": "hi", "id": "spoofed"}))),
        )
        .await;

        // then (期待する結果):
        let expected = vec![ChatEvent::Chat(object(json!({"text": "hi", "id": "c1"})))];
        assert_eq!(chat_events(drain(&mut rx1)), expected);
        assert_eq!(chat_events(drain(&mut rx2)), expected);
        assert!(drain(&mut rx3).is_empty());
    }

    #[tokio::test]
    async fn test_chat_after_disconnect_is_not_delivered() {
        // テスト項目: 購読解除した接続はチャットを受け取らず、送信もできない
        // given (前提条件):
        let (relay, pusher) = create_test_relay();
        let (c1, mut rx1) = connect(&pusher, "c1").await;
        let (c2, mut rx2) = connect(&pusher, "c2").await;
        handle_chat_command(&relay, &c1, ChatCommand::Connect).await;
        handle_chat_command(&relay, &c2, ChatCommand::Connect).await;
        handle_chat_command(&relay, &c2, ChatCommand::Disconnect).await;
        drain(&mut rx1);
        drain(&mut rx2);

        // when (操作):
        handle_chat_command(&relay, &c1, ChatCommand::Chat(object(json!({"text": "a"})))).await;
        handle_chat_command(&relay, &c2, ChatCommand::Chat(object(json!({"text": "b"})))).await;

        // then (期待する結果):
        assert_eq!(
            chat_events(drain(&mut rx1)),
            vec![ChatEvent::Chat(object(json!({"text": "a", "id": "c1"})))]
        );
        assert!(drain(&mut rx2).is_empty());
    }
}
