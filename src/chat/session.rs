//! Core chat session management.
//!
//! [`ChatSession`] walks the session through its states: a health check at
//! startup, a one-time mode selection, then a prompt/dispatch loop that ends on
//! a sentinel or when input closes.

use futures::StreamExt;
use tracing::{debug, info};

use crate::chat::commands::{ChatInput, parse_input};
use crate::chat::config::ChatConfig;
use crate::chat::input::LineSource;
use crate::client::ChatBackend;
use crate::error::Result;
use crate::render::Renderer;
use crate::types::ResponseMode;

/// Prompt shown when asking for the response mode.
pub const MODE_PROMPT: &str = "Type 1 or 2 (default: 1): ";

/// Prompt shown before each user message.
pub const USER_PROMPT: &str = "You: ";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Health check pending.
    Startup,
    /// Waiting for the mode choice.
    ModeSelect,
    /// Waiting for the next user line.
    Prompting,
    /// A message is about to be sent.
    Dispatching(String),
    /// The session is over.
    Terminated,
}

/// Counters describing a finished (or running) session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Whether the startup health check passed.
    pub connected: bool,
    /// The response mode, once chosen.
    pub mode: Option<ResponseMode>,
    /// Messages dispatched to the server.
    pub requests: u64,
    /// Dispatches that ended in an error.
    pub failures: u64,
}

impl SessionStats {
    /// Dispatches that completed without error.
    pub fn succeeded(&self) -> u64 {
        self.requests - self.failures
    }
}

/// A chat session that drives one user's conversation with a backend.
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    config: ChatConfig,
    state: SessionState,
    stats: SessionStats,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new session in the [`SessionState::Startup`] state.
    pub fn new(backend: B, config: ChatConfig) -> Self {
        Self {
            backend,
            config,
            state: SessionState::Startup,
            stats: SessionStats::default(),
        }
    }

    /// The current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The response mode, once chosen.
    pub fn mode(&self) -> Option<ResponseMode> {
        self.stats.mode
    }

    /// A snapshot of the session counters.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the session until it terminates and returns its counters.
    ///
    /// Failed exchanges are reported through `renderer` and do not end the
    /// session. Only a failure to read input is returned as an error.
    pub async fn run(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<SessionStats> {
        while self.state != SessionState::Terminated {
            self.step(input, renderer).await?;
        }
        Ok(self.stats.clone())
    }

    /// Performs one state transition.
    pub async fn step(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let state = std::mem::replace(&mut self.state, SessionState::Terminated);
        self.state = match state {
            SessionState::Startup => self.start(renderer).await,
            SessionState::ModeSelect => self.select_mode(input, renderer)?,
            SessionState::Prompting => self.prompt(input, renderer)?,
            SessionState::Dispatching(message) => {
                self.dispatch(&message, renderer).await;
                SessionState::Prompting
            }
            SessionState::Terminated => SessionState::Terminated,
        };
        Ok(())
    }

    async fn start(&mut self, renderer: &mut dyn Renderer) -> SessionState {
        renderer.print_banner();
        if !self.backend.check_health().await {
            renderer.print_server_down(&self.config.base_url);
            return SessionState::Terminated;
        }
        self.stats.connected = true;
        renderer.print_connected(&self.config.base_url);

        match self.config.mode {
            Some(mode) => {
                self.stats.mode = Some(mode);
                renderer.print_mode(mode);
                SessionState::Prompting
            }
            None => SessionState::ModeSelect,
        }
    }

    fn select_mode(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<SessionState> {
        renderer.print_mode_menu();
        // Closed input picks the default; the next prompt sees it closed too.
        let choice = input.read_line(MODE_PROMPT)?.unwrap_or_default();
        let mode = ResponseMode::from_choice(&choice);
        info!(%mode, "response mode selected");
        self.stats.mode = Some(mode);
        renderer.print_mode(mode);
        Ok(SessionState::Prompting)
    }

    fn prompt(
        &mut self,
        input: &mut dyn LineSource,
        renderer: &mut dyn Renderer,
    ) -> Result<SessionState> {
        let Some(line) = input.read_line(USER_PROMPT)? else {
            return Ok(SessionState::Terminated);
        };
        Ok(match parse_input(&line) {
            ChatInput::Quit => {
                renderer.print_goodbye();
                SessionState::Terminated
            }
            ChatInput::Empty => SessionState::Prompting,
            ChatInput::Message(message) => SessionState::Dispatching(message),
        })
    }

    async fn dispatch(&mut self, message: &str, renderer: &mut dyn Renderer) {
        self.stats.requests += 1;
        let mode = self.stats.mode.unwrap_or_default();
        debug!(%mode, chars = message.len(), "dispatching message");

        renderer.start_response();
        let result = match mode {
            ResponseMode::Complete => self.exchange_complete(message, renderer).await,
            ResponseMode::Streaming => self.exchange_streaming(message, renderer).await,
        };
        match result {
            Ok(()) => renderer.finish_response(),
            Err(err) => {
                self.stats.failures += 1;
                renderer.print_error(&err.to_string());
            }
        }
    }

    async fn exchange_complete(&self, message: &str, renderer: &mut dyn Renderer) -> Result<()> {
        let reply = self.backend.send(message).await?;
        renderer.print_text(&reply);
        Ok(())
    }

    async fn exchange_streaming(&self, message: &str, renderer: &mut dyn Renderer) -> Result<()> {
        let mut chunks = self.backend.stream(message).await?;
        while let Some(chunk) = chunks.next().await {
            renderer.print_text(&chunk?);
        }
        Ok(())
    }
}
