//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_BASE_URL;
use crate::types::ResponseMode;

/// Environment variable consulted for the server URL when no flag is given.
pub const BASE_URL_ENV: &str = "AGNO_SERVER_URL";

/// Command-line arguments for the agno-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the Agno server.
    #[arrrg(
        optional,
        "Agno server URL (default: $AGNO_SERVER_URL or http://localhost:8000)",
        "URL"
    )]
    pub base_url: Option<String>,

    /// Response mode; skips the interactive mode menu when set.
    #[arrrg(optional, "Response mode: stream or complete", "MODE")]
    pub mode: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Error produced when command-line arguments cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatArgsError {
    message: String,
}

impl std::fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ChatArgsError {}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the Agno server.
    pub base_url: String,

    /// Response mode chosen up front. `None` asks the user at startup.
    pub mode: Option<ResponseMode>,

    /// Optional timeout applied to every request.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://localhost:8000
    /// - Mode: asked interactively
    /// - Timeout: none
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: None,
            timeout: None,
            use_color: true,
        }
    }

    /// Sets the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Presets the response mode.
    pub fn with_mode(mut self, mode: Option<ResponseMode>) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Resolves parsed arguments, falling back to `env_base_url` and then the default.
    ///
    /// The caller supplies the environment value so resolution stays pure.
    pub fn from_args(args: ChatArgs, env_base_url: Option<String>) -> Result<Self, ChatArgsError> {
        let mode = match args.mode {
            Some(mode) => Some(
                mode.parse::<ResponseMode>()
                    .map_err(|message| ChatArgsError { message })?,
            ),
            None => None,
        };
        let timeout = match args.timeout {
            Some(0) => {
                return Err(ChatArgsError {
                    message: "--timeout must be at least 1 second".to_string(),
                });
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };
        let base_url = args
            .base_url
            .or(env_base_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(ChatConfig {
            base_url,
            mode,
            timeout,
            use_color: !args.no_color,
        })
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = ChatArgsError;

    fn try_from(args: ChatArgs) -> Result<Self, Self::Error> {
        Self::from_args(args, None)
    }
}
