//! Parsing of input lines into client commands.

use kibitz_server::infrastructure::dto::websocket::{
    ChatCommand, ClientFrame, GameCommand, MovePayload,
};
use serde_json::{Map, Value};

/// A line typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/join <room>`
    Join(String),
    /// `/move <json-or-text>`
    Move(Value),
    /// `/quit`
    Quit,
    /// Any other line
    Chat(String),
}

impl Command {
    /// Parse one input line.
    ///
    /// Returns an error message for a malformed slash command.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Chat(line.to_string()));
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        match name {
            "join" if argument.is_empty() => Err("usage: /join <room>".to_string()),
            "join" => Ok(Command::Join(argument.to_string())),
            "move" if argument.is_empty() => Err("usage: /move <json-or-text>".to_string()),
            "move" => Ok(Command::Move(
                serde_json::from_str(argument)
                    .unwrap_or_else(|_| Value::String(argument.to_string())),
            )),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '/{}'", other)),
        }
    }

    /// Build the frame this command sends, given the room this client sits in.
    ///
    /// Returns `Ok(None)` for commands that send nothing.
    pub fn to_frame(&self, room_id: Option<&str>) -> Result<Option<ClientFrame>, String> {
        match self {
            Command::Join(room) => Ok(Some(ClientFrame::Game(GameCommand::JoinRoom(
                room.clone(),
            )))),
            Command::Move(mv) => {
                let room_id = room_id.ok_or_else(|| "join a room before moving".to_string())?;
                Ok(Some(ClientFrame::Game(GameCommand::Move(MovePayload {
                    room_id: room_id.to_string(),
                    mv: mv.clone(),
                }))))
            }
            Command::Quit => Ok(None),
            Command::Chat(text) => {
                let mut payload = Map::new();
                payload.insert("text".to_string(), Value::String(text.clone()));
                Ok(Some(ClientFrame::Chat(ChatCommand::Chat(payload))))
            }
        }
    }
}
