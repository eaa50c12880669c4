//! Client execution logic with retry support.

use std::time::Duration;

use super::{
    domain::{init_url_for, should_attempt_reconnect},
    session::run_client_session,
};

const MAX_CONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 2;

/// Client settings taken from the command line
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// WebSocket endpoint of the relay
    pub url: String,
    /// Room to join right after connecting
    pub room: Option<String>,
    /// Subscribe to the chat channel after connecting
    pub subscribe_chat: bool,
    /// Call the initialization endpoint before connecting
    pub init_socket: bool,
}

/// Run the WebSocket client, retrying while the relay is not reachable yet
pub async fn run_client(options: ClientOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut attempt = 0;

    loop {
        if options.init_socket {
            initialize_socket(&options.url).await;
        }

        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            options.url,
            attempt + 1,
            MAX_CONNECT_ATTEMPTS
        );

        match run_client_session(&options).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                attempt += 1;
                if !should_attempt_reconnect(&e, attempt, MAX_CONNECT_ATTEMPTS) {
                    return Err(Box::new(e));
                }

                tracing::warn!("{}", e);
                tracing::info!(
                    "Retrying in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    attempt + 1,
                    MAX_CONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

/// Ask the server to attach its relay. Failures are only logged; the
/// upgrade that follows reports whether the relay is available.
async fn initialize_socket(ws_url: &str) {
    let Some(init_url) = init_url_for(ws_url) else {
        tracing::warn!("Cannot derive the initialization URL from {}", ws_url);
        return;
    };

    match reqwest::get(&init_url).await {
        Ok(response) => tracing::debug!("GET {} -> {}", init_url, response.status()),
        Err(e) => tracing::warn!("GET {} failed: {}", init_url, e),
    }
}
