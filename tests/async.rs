use futures::io::BufReader;
use lzwtab::{decode::Decoder, encode::Encoder};
use tokio::io::AsyncWriteExt as _;
use tokio_util::compat::TokioAsyncReadCompatExt as _;

/// Pipe `data` through an in-memory duplex stream, in small writes.
fn feed(data: Vec<u8>) -> BufReader<tokio_util::compat::Compat<tokio::io::DuplexStream>> {
    let (mut tx, rx) = tokio::io::duplex(64);
    tokio::spawn(async move {
        for chunk in data.chunks(17) {
            tx.write_all(chunk).await.unwrap();
        }
        tx.shutdown().await.unwrap();
    });
    BufReader::new(rx.compat())
}

#[tokio::test]
async fn async_roundtrip() {
    let data: Vec<u8> = (0..20_000u32).map(|i| (i / 3 % 97) as u8 ^ (i % 5) as u8).collect();

    let mut encoder = Encoder::new();
    let mut codes = Vec::new();
    let result = encoder
        .into_async(&mut codes)
        .encode_all(feed(data.clone()))
        .await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(result.bytes_read, data.len());
    assert_eq!(lzwtab::text::parse_codes(&codes).unwrap(), lzwtab::encode(&data));

    let mut decoder = Decoder::new();
    let mut output = Vec::new();
    let result = decoder.into_async(&mut output).decode_all(feed(codes)).await;
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(output, data);
}

#[tokio::test]
async fn async_decode_error() {
    let mut decoder = Decoder::new();
    let mut output = Vec::new();
    let result = decoder
        .into_async(&mut output)
        .decode_all(feed(b"300 65".to_vec()))
        .await;
    let err = result.status.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert!(output.is_empty());
}
