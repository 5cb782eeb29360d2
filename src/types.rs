//! Wire types exchanged with an Agno server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body of a `POST /chat` or `POST /chat/stream` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

impl ChatRequest {
    /// Creates a new request carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful `POST /chat` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The agent's complete answer.
    pub response: String,
}

/// The three endpoints an Agno server exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /health`
    Health,
    /// `POST /chat`
    Chat,
    /// `POST /chat/stream`
    ChatStream,
}

impl Endpoint {
    /// Path relative to the server's base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::Chat => "chat",
            Endpoint::ChatStream => "chat/stream",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// How replies are delivered for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Text is printed incrementally as it arrives from `/chat/stream`.
    #[default]
    Streaming,
    /// The full answer is fetched from `/chat` and printed once.
    Complete,
}

impl ResponseMode {
    /// Interprets an answer to the mode menu.
    ///
    /// Only `2` selects [`ResponseMode::Complete`]; anything else, including an
    /// empty answer, keeps the streaming default.
    pub fn from_choice(choice: &str) -> Self {
        if choice.trim() == "2" {
            ResponseMode::Complete
        } else {
            ResponseMode::Streaming
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::Streaming => write!(f, "stream"),
            ResponseMode::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "stream" | "streaming" => Ok(ResponseMode::Streaming),
            "2" | "complete" => Ok(ResponseMode::Complete),
            _ => Err(format!(
                "Invalid response mode: {s}. Valid options: stream, complete"
            )),
        }
    }
}
