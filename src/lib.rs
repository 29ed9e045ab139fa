//! Progressive text decoding for streamed responses
//!
//! A streaming response arrives as raw byte chunks that may cut a multi-byte
//! character in half. [`ProgressiveDecoder`] turns those chunks into text as
//! they arrive, holding back at most three undecoded bytes between calls.
//!
//! When a chunk can't be decoded in the configured charset at all, it is
//! treated as a length-prefixed binary event stream and the embedded
//! payload strings are extracted instead.
//!
//! ```
//! use progressive_decoder::ProgressiveDecoder;
//!
//! let mut decoder = ProgressiveDecoder::default();
//! let bytes = "héllo".as_bytes();
//!
//! let mut text = decoder.decode(&bytes[..2]);
//! text.push_str(&decoder.decode(&bytes[2..]));
//! assert_eq!(text, "héllo");
//! ```

pub mod config;
pub mod protocols;
pub mod streaming;
pub mod telemetry;

pub use config::{ConfigError, DecoderConfig};
pub use protocols::event_stream::{extract_payloads, Frame, Frames};
pub use streaming::{DecodeAttempt, ProgressiveDecoder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_from_config() {
        let config = DecoderConfig::from_bytes(br#"{"charset": "utf-8"}"#).unwrap();
        let mut decoder = config.build_decoder().unwrap();

        assert_eq!(decoder.decode(&[0xE2, 0x82]), "");
        assert_eq!(decoder.decode(&[0xAC, b'5']), "€5");
    }

    #[test]
    fn test_text_then_frames_on_one_stream() {
        let mut decoder = ProgressiveDecoder::default();
        assert_eq!(decoder.decode(b"plain "), "plain ");

        let mut headers = vec![0x80];
        headers.extend_from_slice(b":message-type");
        let frame = protocols::event_stream::encode_frame(&headers, b"{\"text\":\"hi\"}");
        assert_eq!(decoder.decode(&frame), "{\"text\":\"hi\"}");
    }
}
