//! Output rendering for the chat application.
//!
//! The session never prints directly. Everything it shows goes through the
//! [`Renderer`] trait, so the same loop can drive a colored terminal, plain
//! piped output, or a recording double in tests.

use std::io::{self, Stdout, Write};

use crate::types::ResponseMode;

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for green text (used for success and the user label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for yellow text (used for hints).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for blue text (used for the agent label).
const ANSI_BLUE: &str = "\x1b[34m";

/// ANSI escape code for cyan text (used for the mode menu).
const ANSI_CYAN: &str = "\x1b[36m";

/// Width of the horizontal rule drawn between exchanges.
const RULE_WIDTH: usize = 50;

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in tests
pub trait Renderer: Send {
    /// Print the greeting shown once at startup.
    fn print_banner(&mut self);

    /// Report that the health check succeeded.
    fn print_connected(&mut self, base_url: &str);

    /// Report that the health check failed and how to start the server.
    fn print_server_down(&mut self, base_url: &str);

    /// Print the response mode menu, before the choice is read.
    fn print_mode_menu(&mut self);

    /// Confirm the response mode chosen for the session.
    fn print_mode(&mut self, mode: ResponseMode);

    /// Called before the first text of a reply.
    fn start_response(&mut self);

    /// Print a chunk of reply text.
    ///
    /// This is called incrementally as chunks are streamed from the server, or
    /// once with the whole reply in complete mode.
    fn print_text(&mut self, text: &str);

    /// Called when a reply is complete.
    fn finish_response(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print the farewell shown when the user quits.
    fn print_goodbye(&mut self);
}

/// Plain text renderer with optional ANSI styling.
///
/// Reply text goes to stdout and is flushed after every chunk; errors go to
/// stderr.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    line_start: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            line_start: true,
        }
    }

    /// Wraps `text` in `color` when colors are enabled.
    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let _ = self.stdout.write_all(text.as_bytes());
        self.line_start = text.ends_with('\n');
        self.flush();
    }

    fn line(&mut self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    fn rule(&mut self) {
        self.line(&"-".repeat(RULE_WIDTH));
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_banner(&mut self) {
        let name = self.paint(ANSI_GREEN, "AnimeBot");
        let hint = self.paint(ANSI_YELLOW, "Type 'quit' or 'exit' to exit.");
        self.line("");
        self.line(&format!(" {name} - Intelligent Agent"));
        self.line(" Anime + General Knowledge");
        self.line("");
        self.line(&hint);
        self.rule();
    }

    fn print_connected(&mut self, base_url: &str) {
        let message = self.paint(ANSI_GREEN, &format!("Agno server connected at {base_url}"));
        self.line(&message);
        self.rule();
    }

    fn print_server_down(&mut self, base_url: &str) {
        let message = self.paint(ANSI_RED, &format!("Agno server is not running at {base_url}!"));
        let hint = self.paint(
            ANSI_YELLOW,
            "First execute: uvicorn server_agno:app --reload --port 8000",
        );
        eprintln!("{message}");
        eprintln!("{hint}");
    }

    fn print_mode_menu(&mut self) {
        let title = self.paint(ANSI_CYAN, "Choose the response mode:");
        let streaming = self.paint(ANSI_GREEN, "Streaming");
        let complete = self.paint(ANSI_BLUE, "Complete (without streaming)");
        self.line("");
        self.line(&title);
        self.line(&format!("  1. {streaming} - Gradual response in real time"));
        self.line(&format!("  2. {complete} - Complete response (once)"));
    }

    fn print_mode(&mut self, mode: ResponseMode) {
        let message = match mode {
            ResponseMode::Streaming => self.paint(ANSI_GREEN, "Mode: Streaming"),
            ResponseMode::Complete => {
                self.paint(ANSI_BLUE, "Mode: Complete response (without streaming)")
            }
        };
        self.line(&message);
        self.rule();
    }

    fn start_response(&mut self) {
        let label = self.paint(ANSI_BLUE, "Agno: ");
        self.write(&label);
    }

    fn print_text(&mut self, text: &str) {
        self.write(text);
    }

    fn finish_response(&mut self) {
        if !self.line_start {
            self.line("");
        }
        self.rule();
    }

    fn print_error(&mut self, error: &str) {
        if !self.line_start {
            self.line("");
        }
        let message = self.paint(ANSI_RED, &format!("Error: {error}"));
        eprintln!("{message}");
    }

    fn print_goodbye(&mut self) {
        let message = self.paint(ANSI_BLUE, "Goodbye!");
        self.line(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
        assert_eq!(renderer.paint(ANSI_RED, "x"), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.paint(ANSI_RED, "x"), "x");
    }
}
