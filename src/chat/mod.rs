//! Chat application module for interactive conversations with an Agno server.
//!
//! This module provides the REPL that sits on top of the client library. It
//! supports:
//!
//! - Streaming responses printed as they arrive
//! - Complete responses fetched and printed once
//! - `quit`/`exit` sentinels and blank-line skipping
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: classification of input lines
//! - [`input`]: line sources (terminal editor, piped stdin)
//! - [`session`]: the session state machine

mod commands;
mod config;
mod input;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatInput, parse_input};
pub use config::{BASE_URL_ENV, ChatArgs, ChatArgsError, ChatConfig};
pub use input::{BufReadLines, LineSource};
pub use session::{ChatSession, MODE_PROMPT, SessionState, SessionStats, USER_PROMPT};
