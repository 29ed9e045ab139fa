//! Telemetry Module for the progressive decoder
//!
//! Decoding never surfaces an error to the caller, so the only trace of a
//! fallback or a dropped remainder is a structured log line. Events are
//! serialized to one-line JSON and handed to the `log` facade.

use log::{debug, warn};
use serde::Serialize;

/// Prefix attached to every decode event log line
pub const LOG_PREFIX: &str = "[PROGRESSIVE-DECODER]";

/// Decode event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeEventType {
    /// Chunk was not text; event-stream payloads were extracted
    FallbackExtracted,
    /// Chunk was not text and no payload could be extracted
    FallbackEmpty,
    /// Buffered remainder bytes were dropped by the fallback path
    RemainderDiscarded,
}

/// Decode event for logging
#[derive(Debug, Clone, Serialize)]
pub struct DecodeEvent {
    /// Event type
    pub event_type: DecodeEventType,
    /// Encoding the decoder is bound to
    pub charset: &'static str,
    /// Valid bytes in the chunk that triggered the event
    pub chunk_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded_bytes: Option<usize>,
}

impl DecodeEvent {
    pub fn new(event_type: DecodeEventType, charset: &'static str, chunk_len: usize) -> Self {
        Self {
            event_type,
            charset,
            chunk_len,
            payload_count: None,
            discarded_bytes: None,
        }
    }

    /// Set number of extracted payloads
    pub fn with_payload_count(mut self, count: usize) -> Self {
        self.payload_count = Some(count);
        self
    }

    /// Set number of dropped remainder bytes
    pub fn with_discarded_bytes(mut self, count: usize) -> Self {
        self.discarded_bytes = Some(count);
        self
    }

    /// Log the event
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => match self.event_type {
                DecodeEventType::RemainderDiscarded => warn!("{} {}", LOG_PREFIX, json),
                _ => debug!("{} {}", LOG_PREFIX, json),
            },
            Err(e) => {
                warn!("Failed to serialize decode event: {}", e);
            }
        }
    }
}

/// Create a fallback event for a chunk that could not be decoded as text
pub fn fallback(charset: &'static str, chunk_len: usize, payload_count: usize) -> DecodeEvent {
    let event_type = if payload_count == 0 {
        DecodeEventType::FallbackEmpty
    } else {
        DecodeEventType::FallbackExtracted
    };
    DecodeEvent::new(event_type, charset, chunk_len).with_payload_count(payload_count)
}

/// Create an event for remainder bytes dropped on the fallback path
pub fn remainder_discarded(charset: &'static str, chunk_len: usize, bytes: usize) -> DecodeEvent {
    DecodeEvent::new(DecodeEventType::RemainderDiscarded, charset, chunk_len)
        .with_discarded_bytes(bytes)
}
