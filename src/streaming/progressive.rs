//! Progressive Decoder
//!
//! Multi-byte characters can split across chunk boundaries. This module
//! buffers the undecoded tail of each chunk and prepends it to the next one,
//! so the concatenated output reproduces the stream's text exactly.
//!
//! A chunk is decoded strictly: the whole buffer first, then with 1, 2 and
//! 3 bytes held back. Three is enough for every practical encoding (a UTF-8
//! lead byte plus up to three continuation bytes, or a UTF-16 surrogate pair
//! missing its last byte). If no prefix decodes, the chunk is not text and
//! is handed to the event-stream frame scanner instead.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::config::{resolve_charset, ConfigError};
use crate::protocols::event_stream;
use crate::telemetry;

/// Most bytes ever carried from one chunk to the next
pub const MAX_REMAINDER: usize = 3;

/// Outcome of one strict decode over a prefix of the working buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAttempt<'a> {
    /// Bytes of the working buffer that were decoded
    pub consumed: usize,
    /// Decoded text
    pub text: Cow<'a, str>,
}

/// Decodes a byte stream chunk by chunk.
///
/// One instance belongs to one stream and must see its chunks in order.
#[derive(Debug, Clone)]
pub struct ProgressiveDecoder {
    encoding: &'static Encoding,
    /// Trailing bytes the previous call could not decode
    remainder: [u8; MAX_REMAINDER],
    remainder_len: usize,
}

impl ProgressiveDecoder {
    /// Create a decoder bound to `encoding` for its whole lifetime
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            remainder: [0u8; MAX_REMAINDER],
            remainder_len: 0,
        }
    }

    /// Create a decoder from a charset label such as `utf-8` or `utf-16le`
    pub fn for_label(label: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(resolve_charset(label)?))
    }

    /// Encoding fixed at construction
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Bytes held back from the previous call
    pub fn remainder(&self) -> &[u8] {
        &self.remainder[..self.remainder_len]
    }

    /// Drop any carried bytes so the decoder can start a new stream
    pub fn reset(&mut self) {
        self.remainder_len = 0;
    }

    /// Decode a whole chunk
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.decode_next(chunk, chunk.len())
    }

    /// Decode the first `length` bytes of `chunk`.
    ///
    /// Never fails: undecodable tails are carried to the next call, and a
    /// chunk that isn't text at all yields its framed payloads (or `""`).
    pub fn decode_next(&mut self, chunk: &[u8], length: usize) -> String {
        let chunk = &chunk[..length.min(chunk.len())];

        let working: Cow<'_, [u8]> = if self.remainder_len == 0 {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = Vec::with_capacity(self.remainder_len + chunk.len());
            joined.extend_from_slice(self.remainder());
            joined.extend_from_slice(chunk);
            Cow::Owned(joined)
        };

        let attempt = self.attempt(&working);
        let carried = self.remainder_len;

        // Every path replaces the remainder.
        self.remainder_len = 0;

        match attempt {
            Some(DecodeAttempt { consumed, text }) => {
                let tail = &working[consumed..];
                self.remainder[..tail.len()].copy_from_slice(tail);
                self.remainder_len = tail.len();
                text.into_owned()
            }
            None => self.fallback(chunk, carried),
        }
    }

    /// Strictly decode the longest prefix of `buf` that is at most
    /// [`MAX_REMAINDER`] bytes short of the whole buffer.
    pub fn attempt<'a>(&self, buf: &'a [u8]) -> Option<DecodeAttempt<'a>> {
        (0..=MAX_REMAINDER)
            .take_while(|&held_back| held_back <= buf.len())
            .find_map(|held_back| {
                let consumed = buf.len() - held_back;
                self.encoding
                    .decode_without_bom_handling_and_without_replacement(&buf[..consumed])
                    .map(|text| DecodeAttempt { consumed, text })
            })
    }

    fn fallback(&self, chunk: &[u8], carried: usize) -> String {
        let charset = self.encoding.name();
        if carried > 0 {
            telemetry::remainder_discarded(charset, chunk.len(), carried).emit();
        }

        let payloads = event_stream::collect_payloads(chunk, chunk.len());
        telemetry::fallback(charset, chunk.len(), payloads.len()).emit();

        payloads.join(event_stream::PAYLOAD_SEPARATOR)
    }
}

impl Default for ProgressiveDecoder {
    fn default() -> Self {
        Self::new(UTF_8)
    }
}
