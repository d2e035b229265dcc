//! # Fixed width LZW to integer codes
//!
//! This crate provides an [`Encoder`] that turns bytes into a sequence of LZW codes and a
//! [`Decoder`] that turns such a sequence back into bytes. Codes are plain integers in
//! `0..4096`; they are not packed into a bit stream. Both sides start from a dictionary holding
//! every single byte and learn one new entry per emitted code until the 12-bit code space is
//! exhausted, after which they keep using what they have learned.
//!
//! ```
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//! let codes = lzwtab::encode(data);
//! assert!(codes.len() < data.len());
//!
//! let decoded = lzwtab::decode(&codes).unwrap();
//! assert_eq!(decoded, &data[..]);
//! ```
//!
//! Decoding can fail for code sequences that no encoder could have produced. The error keeps
//! whatever was decoded before the offending code:
//!
//! ```
//! use lzwtab::LzwError;
//!
//! let err = lzwtab::decode(&[104, 105, 9999]).unwrap_err();
//! assert_eq!(err.error(), LzwError::InvalidCode(9999));
//! assert_eq!(err.partial(), b"hi");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub(crate) const MAX_CODESIZE: u8 = 12;
pub(crate) const MAX_ENTRIES: usize = 1 << MAX_CODESIZE as usize;
/// The number of codes reserved for single bytes.
pub(crate) const BASE_ENTRIES: usize = 256;

/// Alias for a LZW code point
pub type Code = u16;

pub mod decode;
pub mod encode;
pub mod table;
pub mod text;

pub use crate::decode::{DecodeError, Decoder, LzwError};
pub use crate::encode::Encoder;

use alloc::vec::Vec;

/// Encode all of `data` into codes with a freshly seeded dictionary.
///
/// This never fails. See [`Encoder::encode`] for a lazy variant.
pub fn encode(data: &[u8]) -> Vec<Code> {
    Encoder::new().encode(data).collect()
}

/// Decode a complete code sequence with a freshly seeded dictionary.
///
/// On failure the returned error holds the bytes decoded before the invalid code.
pub fn decode(codes: &[Code]) -> Result<Vec<u8>, DecodeError> {
    let mut output = Vec::with_capacity(codes.len());
    let result = Decoder::new().decode_codes(codes, &mut output);
    match result.status {
        Ok(()) => Ok(output),
        Err(error) => Err(DecodeError::new(error, output)),
    }
}
