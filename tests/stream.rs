use lzwtab::{decode::Decoder, encode::Encoder, text::parse_codes};
use std::io::{self, BufReader};

const TEXT: &[u8] = b"TOBEORNOTTOBEORTOBEORNOT";
const CODES: &[u8] = b"84 79 66 69 79 82 78 79 84 256 258 260 265 259 261 263";

#[test]
fn encode_to_text() {
    let mut encoder = Encoder::new();
    let mut output = vec![];
    let result = encoder.into_stream(&mut output).encode_all(TEXT);
    assert!(result.status.is_ok());
    assert_eq!(result.bytes_read, TEXT.len());
    assert_eq!(result.bytes_written, CODES.len());
    assert_eq!(output, CODES);
}

#[test]
fn encode_small_buffers() {
    // A one byte buffer forces a refill for every input byte.
    let input = BufReader::with_capacity(1, TEXT);
    let mut encoder = Encoder::new();
    let mut output = vec![];
    let result = encoder.into_stream(&mut output).encode_all(input);
    assert!(result.status.is_ok());
    assert_eq!(output, CODES);
}

#[test]
fn encode_in_parts() {
    let (head, tail) = TEXT.split_at(10);
    let mut encoder = Encoder::new();
    let mut output = vec![];
    let mut stream = encoder.into_stream(&mut output);
    assert!(stream.encode(head).status.is_ok());
    assert!(stream.encode_all(tail).status.is_ok());
    assert_eq!(output, CODES);
}

#[test]
fn encode_empty() {
    let mut encoder = Encoder::new();
    let mut output = vec![];
    let result = encoder.into_stream(&mut output).encode_all(&b""[..]);
    assert!(result.status.is_ok());
    assert!(output.is_empty());
}

#[test]
fn decode_from_text() {
    let mut decoder = Decoder::new();
    let mut output = vec![];
    let result = decoder.into_stream(&mut output).decode_all(CODES);
    assert!(result.status.is_ok());
    assert_eq!(result.bytes_read, CODES.len());
    assert_eq!(result.bytes_written, TEXT.len());
    assert_eq!(output, TEXT);
}

#[test]
fn decode_numbers_split_across_buffers() {
    for capacity in 1..8 {
        let input = BufReader::with_capacity(capacity, &b"\n 98\t97  110 257\n97\n"[..]);
        let mut decoder = Decoder::new();
        let mut output = vec![];
        let result = decoder.into_stream(&mut output).decode_all(input);
        assert!(result.status.is_ok(), "{:?}", result.status);
        assert_eq!(output, b"banana", "capacity {}", capacity);
    }
}

#[test]
fn decode_keeps_trailing_number_until_finished() {
    let mut decoder = Decoder::new();
    let mut output = vec![];
    let mut stream = decoder.into_stream(&mut output);
    assert!(stream.decode(&b"104 10"[..]).status.is_ok());
    assert!(stream.decode_all(&b"5"[..]).status.is_ok());
    assert_eq!(output, b"hi");
}

#[test]
fn decode_invalid_code_keeps_prefix() {
    let mut decoder = Decoder::new();
    let mut output = vec![];
    let result = decoder.into_stream(&mut output).decode_all(&b"65 9999"[..]);
    let err = result.status.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(output, b"A");
}

#[test]
fn decode_malformed_number() {
    let mut decoder = Decoder::new();
    let mut output = vec![];
    let result = decoder.into_stream(&mut output).decode_all(&b"72 73 seven"[..]);
    // Only the text up to the malformed byte was accepted.
    assert_eq!(result.bytes_read, b"72 73 ".len());
    let err = result.status.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(output, b"HI");
}

#[test]
fn text_roundtrip() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 7 * 31 + i / 100) as u8).collect();

    let mut encoder = Encoder::new();
    let mut codes = vec![];
    assert!(encoder.into_stream(&mut codes).encode_all(&data[..]).status.is_ok());
    assert_eq!(parse_codes(&codes).unwrap(), lzwtab::encode(&data));

    let mut decoder = Decoder::new();
    let mut output = vec![];
    assert!(decoder.into_stream(&mut output).decode_all(&codes[..]).status.is_ok());
    assert_eq!(output, data);
}
