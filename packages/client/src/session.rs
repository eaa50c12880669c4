//! WebSocket client session management.

use std::{fmt::Display, sync::Arc};

use futures_util::{Sink, SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{Mutex, mpsc, watch};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, http::StatusCode, protocol::Message},
};

use kibitz_server::infrastructure::dto::websocket::{
    ChatCommand, ClientFrame, GameCommand, ServerFrame,
};
use kibitz_shared::time::get_timestamp;

use crate::{command::Command, domain::ClientState, error::ClientError, runner::ClientOptions};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Encode a frame and write it to the socket.
async fn send_frame<S>(write: &mut S, frame: &ClientFrame) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let json = frame
        .to_json()
        .map_err(|e| ClientError::ProtocolError(e.to_string()))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Run the WebSocket client session
pub async fn run_client_session(options: &ClientOptions) -> Result<(), ClientError> {
    let (ws_stream, _response) = match connect_async(options.url.as_str()).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::SERVICE_UNAVAILABLE =>
        {
            return Err(ClientError::RelayUnavailable);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to relay server!");
    println!(
        "\nCommands: /join <room>, /move <json-or-text>, /quit. Any other line is sent as chat.\n"
    );

    let (mut write, mut read) = ws_stream.split();

    if options.subscribe_chat {
        send_frame(&mut write, &ClientFrame::Chat(ChatCommand::Connect)).await?;
    }
    if let Some(room) = &options.room {
        send_frame(
            &mut write,
            &ClientFrame::Game(GameCommand::JoinRoom(room.clone())),
        )
        .await?;
    }

    let state = Arc::new(Mutex::new(ClientState::default()));
    let (prompt_tx, prompt_rx) = watch::channel(ClientState::default().prompt());

    // Spawn a task to handle incoming frames
    let state_for_read = state.clone();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match ServerFrame::parse(&text) {
                        Ok(frame) => {
                            let mut state = state_for_read.lock().await;
                            state.apply(&frame);
                            prompt_tx.send_replace(state.prompt());
                            MessageFormatter::format_frame(&frame, get_timestamp())
                        }
                        Err(e) => {
                            tracing::debug!("Undecodable frame: {}", e);
                            MessageFormatter::format_raw_message(&text)
                        }
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&prompt_tx.borrow());
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&prompt_tx.borrow());
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            let prompt = prompt_rx.borrow().clone();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into frames
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let command = match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };

            let room_id = state.lock().await.room_id.clone();
            let frame = match command.to_frame(room_id.as_deref()) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };

            if let Err(e) = send_frame(&mut write, &frame).await {
                tracing::warn!("Failed to send frame: {}", e);
                write_error = true;
                break;
            }
        }

        if !write_error {
            write.send(Message::Close(None)).await.ok();
        }
        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionLost);
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionLost);
            }
        }
    }

    Ok(())
}
