//! InMemory chat subscriber registry.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatSubscriberRepository, ConnectionId};

/// Current chat subscribers, kept in id order.
#[derive(Default)]
pub struct InMemoryChatSubscriberRepository {
    subscribers: Mutex<BTreeSet<ConnectionId>>,
}

impl InMemoryChatSubscriberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatSubscriberRepository for InMemoryChatSubscriberRepository {
    async fn add_subscriber(&self, connection_id: ConnectionId) -> bool {
        self.subscribers.lock().await.insert(connection_id)
    }

    async fn remove_subscriber(&self, connection_id: &ConnectionId) -> bool {
        self.subscribers.lock().await.remove(connection_id)
    }

    async fn get_subscribers(&self) -> Vec<ConnectionId> {
        self.subscribers.lock().await.iter().cloned().collect()
    }
}
