//! Factories for server-issued identifiers.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Issues connection ids for freshly upgraded sockets.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a random (UUID v4) connection id.
    pub fn generate() -> ConnectionId {
        ConnectionId::from(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_returns_unique_ids() {
        // テスト項目: 生成される接続 ID は毎回異なる
        // given (前提条件):

        // when (操作):
        let first = ConnectionIdFactory::generate();
        let second = ConnectionIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 36);
    }
}
