//! Protocol Handlers
//!
//! This module provides the binary fallback format:
//! - Length-prefixed event-stream frames wrapping textual payloads

pub mod event_stream;

pub use event_stream::{extract_payloads, Frame, Frames};
