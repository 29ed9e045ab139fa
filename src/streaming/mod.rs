//! Streaming module for chunk-by-chunk text decoding
//!
//! This module provides the stateful half of the crate:
//! - Carries incomplete multi-byte sequences across chunk boundaries
//! - Falls back to event-stream payload extraction for non-text chunks

pub mod progressive;

pub use progressive::{DecodeAttempt, ProgressiveDecoder, MAX_REMAINDER};
