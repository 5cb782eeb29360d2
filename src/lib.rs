// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod stream;
pub mod types;

// Re-exports
pub use client::{AgnoClient, ChatBackend, DEFAULT_BASE_URL};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use stream::{DEFAULT_CHUNK_CAPACITY, TextStream, text_chunks};
pub use types::*;
