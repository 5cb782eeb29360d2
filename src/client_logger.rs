//! Logging trait for Agno client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all traffic passing through an [`AgnoClient`](crate::AgnoClient).

use crate::types::{ChatRequest, ChatResponse, Endpoint};

/// A trait for logging Agno client operations.
///
/// Implement this trait to record every exchange with the server, including the
/// individual chunks of a streamed reply.
///
/// # Example
///
/// ```rust,ignore
/// use agno_chat::{ChatRequest, ChatResponse, ClientLogger, Endpoint};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, endpoint: Endpoint, request: &ChatRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{endpoint} <- {}", request.message).unwrap();
///     }
///
///     fn log_response(&self, response: &ChatResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "response: {}", response.response).unwrap();
///     }
///
///     fn log_stream_chunk(&self, chunk: &str) {
///         let mut file = self.file.lock().unwrap();
///         write!(file, "{chunk}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent to `endpoint`.
    fn log_request(&self, endpoint: Endpoint, request: &ChatRequest);

    /// Log a decoded response from a complete (non-streaming) call.
    fn log_response(&self, response: &ChatResponse);

    /// Log one chunk of a streamed reply, in arrival order.
    fn log_stream_chunk(&self, chunk: &str);
}
