//! Line sources for the chat loop.
//!
//! The session reads through [`LineSource`] so it can be driven by an
//! interactive `rustyline` editor, by piped stdin, or by a script in tests.

use std::io::{self, BufRead, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// A source of input lines.
pub trait LineSource {
    /// Shows `prompt` and reads one line without its terminator.
    ///
    /// Returns `Ok(None)` once the input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl+C at the prompt reads as a blank line so the prompt is shown again.
            Err(ReadlineError::Interrupted) => {
                println!();
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(Error::io(
                format!("failed to read input: {err}"),
                io::Error::other(err.to_string()),
            )),
        }
    }
}

/// Reads lines from any buffered reader, echoing prompts to a writer.
///
/// Used when stdin is not a terminal.
pub struct BufReadLines<R, W> {
    reader: R,
    prompts: W,
}

impl<R: BufRead, W: Write> BufReadLines<R, W> {
    /// Creates a line source reading from `reader` and writing prompts to `prompts`.
    pub fn new(reader: R, prompts: W) -> Self {
        Self { reader, prompts }
    }
}

impl<R: BufRead, W: Write> LineSource for BufReadLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.write_all(prompt.as_bytes())?;
        self.prompts.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}
