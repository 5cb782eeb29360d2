//! Classification of raw input lines.
//!
//! A line typed at the `You:` prompt is either a sentinel that ends the
//! session, blank, or a message for the server.

/// A classified line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// `quit` or `exit`, in any case.
    Quit,

    /// Nothing but whitespace; the prompt is shown again.
    Empty,

    /// Trimmed text to send to the server.
    Message(String),
}

/// Classifies a line read from the user.
///
/// # Examples
///
/// ```
/// # use agno_chat::chat::{ChatInput, parse_input};
/// assert_eq!(parse_input("  EXIT "), ChatInput::Quit);
/// assert_eq!(parse_input("   "), ChatInput::Empty);
/// assert_eq!(
///     parse_input(" Who is Goku? "),
///     ChatInput::Message("Who is Goku?".to_string())
/// );
/// ```
pub fn parse_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ChatInput::Empty
    } else if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        ChatInput::Quit
    } else {
        ChatInput::Message(trimmed.to_string())
    }
}
