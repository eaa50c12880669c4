//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    gateway::{Gateway, GatewayError},
    handler::{health_check, init_socket, websocket_handler},
    signal::shutdown_signal,
    state::{AppState, RelayState},
};

/// Path of the WebSocket endpoint carrying the chat and game channels
pub const SOCKET_PATH: &str = "/api/socket.io";

/// Move relay server
///
/// # Example
///
/// ```ignore
/// let relay = Arc::new(RelayState::new(room_repository, chat_subscribers, message_pusher));
/// let server = Server::new(relay, true);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// Relay handlers（チャット・ゲームチャンネルのユースケース）
    relay: Arc<RelayState>,
    /// Attach the relay as soon as the listener is bound
    attach_on_startup: bool,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `relay` - Use cases behind the chat and game channels
    /// * `attach_on_startup` - Attach right after binding instead of waiting for `GET /api/socket`
    pub fn new(relay: Arc<RelayState>, attach_on_startup: bool) -> Self {
        Self {
            relay,
            attach_on_startup,
        }
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        self.serve(listener).await?;
        Ok(())
    }

    /// Serve on an already bound listener until a shutdown signal arrives.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let local_addr = listener.local_addr()?;
        let app_state = Arc::new(AppState {
            gateway: Gateway::new(self.relay),
        });
        app_state.gateway.expose_host(local_addr);

        if self.attach_on_startup {
            match app_state.gateway.attach() {
                Ok(_) => {}
                Err(GatewayError::NotReady) => {
                    tracing::warn!("Relay not attached at startup, waiting for GET /api/socket")
                }
            }
        }

        let app = router(app_state);

        tracing::info!("Kibitz relay server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}{}", local_addr, SOCKET_PATH);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route(SOCKET_PATH, get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/socket", get(init_socket))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
