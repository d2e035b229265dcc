#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codes = lzwtab::encode(data);
    assert!(codes.iter().all(|&code| code < 4096));

    let result = lzwtab::decode(&codes);
    assert!(result.is_ok(), "{:?}", result.as_ref().err());
    assert_eq!(result.unwrap(), data);
});
