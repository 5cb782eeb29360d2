//! Interactive chat client for an Agno server.
//!
//! This binary checks that the server is up, asks for a response mode, and then
//! forwards each line you type, printing the agent's reply.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a server on http://localhost:8000
//! agno-chat
//!
//! # Point at another server and skip the mode menu
//! agno-chat --base-url http://10.0.0.5:8000 --mode complete
//!
//! # Disable colors (also automatic when stdout is not a terminal)
//! agno-chat --no-color
//! ```
//!
//! Type `quit` or `exit` to leave. Set `RUST_LOG=debug` to see request logs on
//! stderr.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use agno_chat::AgnoClient;
use agno_chat::chat::{
    BASE_URL_ENV, BufReadLines, ChatArgs, ChatConfig, ChatSession, LineSource, PlainTextRenderer,
};

/// Main entry point for the agno-chat application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let (args, free) = ChatArgs::from_command_line_relaxed("agno-chat [OPTIONS]");
    if !free.is_empty() {
        eprintln!("unexpected arguments: {}", free.join(" "));
        return Ok(ExitCode::FAILURE);
    }
    let mut config = ChatConfig::from_args(args, std::env::var(BASE_URL_ENV).ok())?;
    if !io::stdout().is_terminal() {
        config = config.without_color();
    }

    let client = AgnoClient::with_options(&config.base_url, config.timeout)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut input: Box<dyn LineSource> = if io::stdin().is_terminal() {
        Box::new(DefaultEditor::new()?)
    } else {
        Box::new(BufReadLines::new(io::stdin().lock(), io::stdout()))
    };

    let mut session = ChatSession::new(client, config);
    let stats = session.run(input.as_mut(), &mut renderer).await?;
    tracing::debug!(?stats, "session finished");

    if stats.connected {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
