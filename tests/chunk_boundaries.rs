//! Stream-level properties of the progressive decoder

use progressive_decoder::protocols::event_stream::{encode_frame, extract_payloads};
use progressive_decoder::streaming::MAX_REMAINDER;
use progressive_decoder::ProgressiveDecoder;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn decode_in_chunks(decoder: &mut ProgressiveDecoder, bytes: &[u8], sizes: &[usize]) -> String {
    let mut out = String::new();
    let mut rest = bytes;
    let mut sizes = sizes.iter().map(|s| s % 7 + 1).cycle();
    while !rest.is_empty() {
        let take = sizes.next().unwrap_or(1).min(rest.len());
        let (chunk, tail) = rest.split_at(take);
        out.push_str(&decoder.decode(chunk));
        rest = tail;
    }
    out
}

#[quickcheck]
fn split_once_reproduces_text(text: String, split: usize) -> bool {
    let bytes = text.as_bytes();
    let split = if bytes.is_empty() { 0 } else { split % (bytes.len() + 1) };

    let mut decoder = ProgressiveDecoder::default();
    let mut out = decoder.decode(&bytes[..split]);
    out.push_str(&decoder.decode(&bytes[split..]));

    out == text && decoder.remainder().is_empty()
}

#[quickcheck]
fn many_chunks_reproduce_text(text: String, sizes: Vec<usize>) -> TestResult {
    if sizes.is_empty() {
        return TestResult::discard();
    }
    let mut decoder = ProgressiveDecoder::default();
    let out = decode_in_chunks(&mut decoder, text.as_bytes(), &sizes);
    TestResult::from_bool(out == text)
}

#[quickcheck]
fn utf16_chunks_reproduce_text(text: String, sizes: Vec<usize>) -> TestResult {
    if sizes.is_empty() {
        return TestResult::discard();
    }
    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();

    let mut decoder = ProgressiveDecoder::for_label("utf-16le").unwrap();
    let out = decode_in_chunks(&mut decoder, &bytes, &sizes);
    TestResult::from_bool(out == text)
}

#[quickcheck]
fn remainder_stays_bounded(chunks: Vec<Vec<u8>>) -> bool {
    let mut decoder = ProgressiveDecoder::default();
    chunks.iter().all(|chunk| {
        decoder.decode(chunk);
        decoder.remainder().len() <= MAX_REMAINDER
    })
}

#[quickcheck]
fn extraction_terminates_on_arbitrary_bytes(bytes: Vec<u8>, length: usize) -> bool {
    // Only has to return; the content is irrelevant.
    let _ = extract_payloads(&bytes, length);
    true
}

#[quickcheck]
fn framed_payloads_round_trip(payloads: Vec<String>) -> TestResult {
    let payloads: Vec<String> = payloads.into_iter().filter(|p| !p.is_empty()).collect();
    if payloads.is_empty() {
        return TestResult::discard();
    }
    let buf: Vec<u8> = payloads
        .iter()
        .flat_map(|p| encode_frame(b":event-type", p.as_bytes()))
        .collect();

    TestResult::from_bool(extract_payloads(&buf, buf.len()) == payloads.join("\n\n"))
}

#[test]
fn readme_example() {
    let bytes = [0x68, 0xC3, 0xA9, 0x6C, 0x6C, 0x6F];
    let mut decoder = ProgressiveDecoder::default();

    assert_eq!(decoder.decode(&bytes[..2]), "h");
    assert_eq!(decoder.remainder(), &[0xC3]);
    assert_eq!(decoder.decode(&bytes[2..]), "éllo");
}
