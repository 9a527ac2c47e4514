//! Incremental UTF-8 decoding of a chunked response body.

use aihub_types::{ChatError, Result};

/// Turns byte chunks into text. A multi-byte character split across two
/// chunks is held back until the rest of it arrives. Invalid bytes are an error.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    consumed: usize,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `chunk` (plus any held-back bytes) as is complete.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String> {
        self.pending.extend_from_slice(chunk);

        let complete = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) => match e.error_len() {
                // Incomplete sequence at the end: keep it for the next chunk
                None => e.valid_up_to(),
                Some(_) => {
                    return Err(ChatError::Stream(format!(
                        "invalid UTF-8 at byte {}",
                        self.consumed + e.valid_up_to()
                    )));
                }
            },
        };

        let bytes: Vec<u8> = self.pending.drain(..complete).collect();
        self.consumed += complete;
        String::from_utf8(bytes).map_err(|e| ChatError::Stream(e.to_string()))
    }

    /// Bytes waiting for the rest of their character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total bytes decoded so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Call at end of stream. Leftover bytes mean the body was cut mid-character.
    pub fn finish(&self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(ChatError::Stream(format!(
                "stream ended inside a UTF-8 sequence ({} dangling bytes)",
                self.pending.len()
            )))
        }
    }
}
