//! Incremental text decoding for streamed response bodies.
//!
//! `/chat/stream` answers with an unframed byte stream. [`text_chunks`] reads it
//! through a fixed-size buffer and yields each read as text, so callers decide
//! whether to print, buffer, or parse it further.
//!
//! Reads are not aligned to character boundaries. A multi-byte character cut in
//! half by a read is held back and emitted whole with the next chunk; bytes that
//! can never form valid UTF-8 end the stream with an encoding error.

use std::pin::Pin;

use futures::Stream;
use futures::stream;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_BYTES, STREAM_CHUNKS, STREAM_ERRORS};

/// Size of the buffer each read from a streamed body fills.
pub const DEFAULT_CHUNK_CAPACITY: usize = 1024;

/// A finite stream of text chunks, ending at end-of-data or after the first error.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Buffers the trailing bytes of a character split across reads.
#[derive(Debug, Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    fn push(&mut self, bytes: &[u8]) -> Result<String> {
        self.pending.extend_from_slice(bytes);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => {
                return Err(Error::encoding(
                    format!("invalid UTF-8 in stream: {err}"),
                    Some(Box::new(err)),
                ));
            }
        };
        let text = std::str::from_utf8(&self.pending[..valid])?.to_string();
        self.pending.drain(..valid);
        Ok(text)
    }

    fn finish(&self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(Error::encoding(
                format!(
                    "stream ended inside a multi-byte character ({} dangling bytes)",
                    self.pending.len()
                ),
                None,
            ))
        }
    }
}

struct ChunkReader<R> {
    source: R,
    buffer: Vec<u8>,
    carry: Utf8Carry,
}

/// Turns `reader` into a stream of text chunks using a buffer of `capacity` bytes.
///
/// Each successful read yields the text it completed. The stream ends when the
/// reader reports end-of-data. A read failure is yielded as a transport error and
/// ends the stream; chunks yielded before it stand.
pub fn text_chunks<R>(reader: R, capacity: usize) -> impl Stream<Item = Result<String>>
where
    R: AsyncRead + Unpin,
{
    let state = ChunkReader {
        source: reader,
        buffer: vec![0u8; capacity.max(1)],
        carry: Utf8Carry::default(),
    };

    stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        loop {
            match state.source.read(&mut state.buffer).await {
                Ok(0) => {
                    return match state.carry.finish() {
                        Ok(()) => None,
                        Err(err) => {
                            STREAM_ERRORS.click();
                            Some((Err(err), None))
                        }
                    };
                }
                Ok(n) => {
                    STREAM_BYTES.count(n as u64);
                    match state.carry.push(&state.buffer[..n]) {
                        Ok(text) if text.is_empty() => continue,
                        Ok(text) => {
                            STREAM_CHUNKS.click();
                            return Some((Ok(text), Some(state)));
                        }
                        Err(err) => {
                            STREAM_ERRORS.click();
                            return Some((Err(err), None));
                        }
                    }
                }
                Err(err) => {
                    STREAM_ERRORS.click();
                    let err = Error::transport(
                        format!("error reading response stream: {err}"),
                        Some(Box::new(err)),
                    );
                    return Some((Err(err), None));
                }
            }
        }
    })
}
