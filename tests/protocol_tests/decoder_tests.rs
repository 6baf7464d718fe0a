//! Resumable Decoder Tests
//!
//! Tests for stream reassembly across partial reads.

use pulsekv::protocol::{encode_command, Command, CommandDecoder};
use pulsekv::PulseError;

// =============================================================================
// Whole-Frame Tests
// =============================================================================

#[test]
fn test_decoder_empty_yields_none() {
    let mut decoder = CommandDecoder::new();
    assert!(decoder.next_command().unwrap().is_none());
}

#[test]
fn test_decoder_single_frame() {
    let cmd = Command::Get {
        key: b"hello".to_vec(),
    };

    let mut decoder = CommandDecoder::new();
    decoder.feed(&encode_command(&cmd));

    assert_eq!(decoder.next_command().unwrap(), Some(cmd));
    assert!(decoder.next_command().unwrap().is_none());
    assert_eq!(decoder.buffered(), 0);
}

#[test]
fn test_decoder_multiple_frames_one_feed() {
    // TCP may deliver several messages in a single read
    let first = Command::Set {
        key: b"a".to_vec(),
        value: b"1".to_vec(),
    };
    let second = Command::Get { key: b"a".to_vec() };
    let third = Command::Del { key: b"a".to_vec() };

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&encode_command(&first));
    bytes.extend_from_slice(&encode_command(&second));
    bytes.extend_from_slice(&encode_command(&third));

    let mut decoder = CommandDecoder::new();
    decoder.feed(&bytes);

    assert_eq!(decoder.next_command().unwrap(), Some(first));
    assert_eq!(decoder.next_command().unwrap(), Some(second));
    assert_eq!(decoder.next_command().unwrap(), Some(third));
    assert!(decoder.next_command().unwrap().is_none());
}

// =============================================================================
// Partial-Read Tests
// =============================================================================

#[test]
fn test_decoder_one_byte_at_a_time() {
    // A message spanning many reads must still parse exactly once
    let cmd = Command::Publish {
        topic: b"news".to_vec(),
        value: b"hello subscribers".to_vec(),
    };
    let encoded = encode_command(&cmd);

    let mut decoder = CommandDecoder::new();
    for &byte in &encoded[..encoded.len() - 1] {
        decoder.feed(&[byte]);
        assert!(decoder.next_command().unwrap().is_none());
    }

    decoder.feed(&encoded[encoded.len() - 1..]);
    assert_eq!(decoder.next_command().unwrap(), Some(cmd));
    assert!(decoder.next_command().unwrap().is_none());
}

#[test]
fn test_decoder_frame_split_across_feeds() {
    let cmd = Command::Set {
        key: b"split".to_vec(),
        value: b"across reads".to_vec(),
    };
    let encoded = encode_command(&cmd);
    let mid = encoded.len() / 2;

    let mut decoder = CommandDecoder::new();
    decoder.feed(&encoded[..mid]);
    assert!(decoder.next_command().unwrap().is_none());

    decoder.feed(&encoded[mid..]);
    assert_eq!(decoder.next_command().unwrap(), Some(cmd));
}

#[test]
fn test_decoder_split_boundary_mid_header() {
    // Fewer bytes than a header must not be treated as a frame
    let cmd = Command::Get { key: b"k".to_vec() };
    let encoded = encode_command(&cmd);

    let mut decoder = CommandDecoder::new();
    decoder.feed(&encoded[..3]);
    assert!(decoder.next_command().unwrap().is_none());
    assert_eq!(decoder.buffered(), 3);

    decoder.feed(&encoded[3..]);
    assert_eq!(decoder.next_command().unwrap(), Some(cmd));
}

#[test]
fn test_decoder_carries_tail_into_next_frame() {
    // One read ends with the head of the following message
    let first = Command::Get { key: b"a".to_vec() };
    let second = Command::Get { key: b"b".to_vec() };

    let first_encoded = encode_command(&first);
    let second_encoded = encode_command(&second);

    let mut chunk = first_encoded.clone();
    chunk.extend_from_slice(&second_encoded[..2]);

    let mut decoder = CommandDecoder::new();
    decoder.feed(&chunk);

    assert_eq!(decoder.next_command().unwrap(), Some(first));
    assert!(decoder.next_command().unwrap().is_none());

    decoder.feed(&second_encoded[2..]);
    assert_eq!(decoder.next_command().unwrap(), Some(second));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_decoder_unknown_command() {
    let mut decoder = CommandDecoder::new();
    decoder.feed(&[0x7F, 0x00, 0x00, 0x00, 0x00]);

    let result = decoder.next_command();
    assert!(matches!(result, Err(PulseError::MalformedCommand(0x7F))));
}

#[test]
fn test_decoder_oversized_length_rejected_early() {
    // An absurd length field fails as soon as the header is readable,
    // without waiting for the payload
    let mut frame = vec![0x01];
    frame.extend_from_slice(&u32::MAX.to_be_bytes());

    let mut decoder = CommandDecoder::new();
    decoder.feed(&frame);

    let result = decoder.next_command();
    assert!(matches!(result, Err(PulseError::Framing(_))));
}
