#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|raw_data: &[u8]| {
    let codes: Vec<u16> = raw_data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) & 0x1fff)
        .collect();

    // Arbitrary codes may be rejected, the partial output must still match a chunked decoder.
    let whole = match lzwtab::decode(&codes) {
        Ok(bytes) => bytes,
        Err(err) => err.into_partial(),
    };

    let mut decoder = lzwtab::Decoder::new();
    let mut chunked = vec![];
    for chunk in codes.chunks(7) {
        if decoder.decode_codes(chunk, &mut chunked).status.is_err() {
            break;
        }
    }
    assert_eq!(whole, chunked);
});
