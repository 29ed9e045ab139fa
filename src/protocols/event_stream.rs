//! Length-prefixed event-stream frame scanner
//!
//! Some streamed responses are not text at all but a binary framing that
//! wraps textual payloads. Each frame is laid out as:
//!
//! ```text
//! +-------------+---------------+---------+---------+---------+
//! | total_len   | headers_len   | headers | payload | trailer |
//! | 4B (BE)     | 4B (BE)       | h bytes | n bytes | 4B      |
//! +-------------+---------------+---------+---------+---------+
//! ```
//!
//! The four bytes between the prelude and the headers are counted in the
//! 12-byte minimum but never read. Headers are skipped, not parsed, and the
//! trailer checksum is not verified. Malformed frames are stepped over one
//! at a time; scanning never fails.

use std::str;

/// Bytes holding `total_len` and `headers_len`
pub const PRELUDE_LEN: usize = 8;

/// Smallest frame that can carry a payload offset
pub const MIN_FRAME_LEN: usize = 12;

/// Trailing checksum bytes, ignored
pub const TRAILER_LEN: usize = 4;

/// Separator placed between extracted payloads
pub const PAYLOAD_SEPARATOR: &str = "\n\n";

/// A view over one frame inside a scanned buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Declared length of the whole frame
    pub total_length: u32,
    /// Declared length of the header block
    pub headers_length: u32,
    /// Header block, `None` when `headers_length` runs past the frame
    pub headers: Option<&'a [u8]>,
    /// Payload bytes, `None` when the declared lengths don't describe a
    /// non-empty payload inside the buffer
    pub payload: Option<&'a [u8]>,
}

impl<'a> Frame<'a> {
    /// Payload decoded as UTF-8, `None` if absent or malformed
    pub fn payload_str(&self) -> Option<&'a str> {
        self.payload.and_then(|bytes| str::from_utf8(bytes).ok())
    }
}

/// Iterator over the frames of a buffer
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Frames<'a> {
    /// Scan the first `length` bytes of `buffer`
    pub fn new(buffer: &'a [u8], length: usize) -> Self {
        let length = length.min(buffer.len());
        Self {
            buffer: &buffer[..length],
            offset: 0,
        }
    }

    fn read_u32(&self, at: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.buffer[at..at + 4]);
        u32::from_be_bytes(word)
    }

    fn header_bounds(&self, total_length: usize, headers_length: usize) -> Option<(usize, usize)> {
        let start = self.offset.checked_add(MIN_FRAME_LEN)?;
        let end = start.checked_add(headers_length)?;

        (end <= self.offset + total_length).then_some((start, end))
    }

    fn payload_bounds(&self, total_length: usize, headers_length: usize) -> Option<(usize, usize)> {
        let start = self
            .offset
            .checked_add(MIN_FRAME_LEN)?
            .checked_add(headers_length)?;
        let end = (self.offset + total_length).checked_sub(TRAILER_LEN)?;

        (start > 0 && start < end && end <= self.buffer.len()).then_some((start, end))
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let length = self.buffer.len();
        if self.offset.checked_add(MIN_FRAME_LEN)? > length {
            return None;
        }

        let total_length = self.read_u32(self.offset);
        let headers_length = self.read_u32(self.offset + 4);

        // A zero length would never advance the offset.
        if total_length == 0 {
            self.offset = length;
            return None;
        }

        let total = total_length as usize;
        if self.offset.checked_add(total).map_or(true, |end| end > length) {
            self.offset = length;
            return None;
        }

        let headers = self
            .header_bounds(total, headers_length as usize)
            .map(|(start, end)| &self.buffer[start..end]);
        let payload = self
            .payload_bounds(total, headers_length as usize)
            .map(|(start, end)| &self.buffer[start..end]);

        self.offset += total;

        Some(Frame {
            total_length,
            headers_length,
            headers,
            payload,
        })
    }
}

/// Extract every UTF-8 payload from the first `length` bytes of `buffer`.
///
/// Payloads are joined with [`PAYLOAD_SEPARATOR`]; the result is empty when
/// no frame yields a payload.
pub fn extract_payloads(buffer: &[u8], length: usize) -> String {
    collect_payloads(buffer, length).join(PAYLOAD_SEPARATOR)
}

/// Payload strings of every well-formed frame, in stream order
pub fn collect_payloads(buffer: &[u8], length: usize) -> Vec<&str> {
    Frames::new(buffer, length)
        .filter_map(|frame| frame.payload_str())
        .collect()
}

/// Write one frame with the given headers and payload and a zeroed trailer
pub fn encode_frame(headers: &[u8], payload: &[u8]) -> Vec<u8> {
    let total = MIN_FRAME_LEN + headers.len() + payload.len() + TRAILER_LEN;
    let mut frame = Vec::with_capacity(total);
    frame.extend_from_slice(&(total as u32).to_be_bytes());
    frame.extend_from_slice(&(headers.len() as u32).to_be_bytes());
    frame.extend_from_slice(&[0u8; MIN_FRAME_LEN - PRELUDE_LEN]);
    frame.extend_from_slice(headers);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&[0u8; TRAILER_LEN]);
    frame
}
