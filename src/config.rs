//! Configuration module for the progressive decoder
//!
//! The only knob is the charset negotiated for the stream. It is resolved
//! once, when the decoder is built, and never changes afterwards.

use encoding_rs::Encoding;
use serde::Deserialize;
use thiserror::Error;

use crate::streaming::ProgressiveDecoder;

/// Decoder configuration, usually deserialized from JSON
#[derive(Clone, Debug, Deserialize)]
pub struct DecoderConfig {
    /// WHATWG charset label, e.g. `utf-8` or `utf-16le`
    #[serde(default = "default_charset")]
    pub charset: String,
}

fn default_charset() -> String {
    "utf-8".to_string()
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
        }
    }
}

impl DecoderConfig {
    /// Parse configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config_str =
            std::str::from_utf8(bytes).map_err(|e| ConfigError::InvalidUtf8(e.to_string()))?;

        serde_json::from_str(config_str).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }

    /// Resolve the configured charset label
    pub fn encoding(&self) -> Result<&'static Encoding, ConfigError> {
        resolve_charset(&self.charset)
    }

    /// Build a fresh decoder bound to the configured charset
    pub fn build_decoder(&self) -> Result<ProgressiveDecoder, ConfigError> {
        Ok(ProgressiveDecoder::new(self.encoding()?))
    }
}

/// Look up a charset label.
///
/// Labels mapping to the replacement encoding are refused: that encoding
/// fails every strict decode, so each chunk would go to the fallback.
pub fn resolve_charset(label: &str) -> Result<&'static Encoding, ConfigError> {
    Encoding::for_label_no_replacement(label.trim().as_bytes())
        .ok_or_else(|| ConfigError::UnknownCharset(label.to_string()))
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Unknown charset: {0:?}")]
    UnknownCharset(String),
}
