//! Codes as decimal text.
//!
//! The stream adapters exchange codes as ASCII decimal numbers separated by whitespace. On
//! output a single space separates consecutive codes. On input any ASCII whitespace separates
//! them and a number may be split across several buffers.
use crate::Code;

use alloc::vec::Vec;
use core::fmt;

/// A malformed number in a code text.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseCodeError {
    #[error("unexpected byte {0:#04x} in code list")]
    InvalidDigit(u8),
    #[error("code does not fit into 16 bits")]
    Overflow,
}

/// An incremental tokenizer for whitespace separated decimal codes.
#[derive(Debug, Default)]
pub struct CodeScanner {
    /// The value of the number currently being read, if any.
    pending: Option<Code>,
    /// The number of bytes accepted so far.
    consumed: usize,
}

impl CodeScanner {
    /// Create a scanner at the start of a code text.
    pub fn new() -> Self {
        CodeScanner::default()
    }

    /// Tokenize `inp`, appending every complete code to `out`.
    ///
    /// A trailing number without a following separator is kept pending until the next call or
    /// [`finish`]. On error the remainder of `inp` is not examined.
    ///
    /// [`finish`]: #method.finish
    pub fn scan(&mut self, inp: &[u8], out: &mut Vec<Code>) -> Result<(), ParseCodeError> {
        for &byte in inp {
            match byte {
                b'0'..=b'9' => {
                    let digit = Code::from(byte - b'0');
                    let value = self
                        .pending
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|value| value.checked_add(digit))
                        .ok_or(ParseCodeError::Overflow)?;
                    self.pending = Some(value);
                }
                _ if byte.is_ascii_whitespace() => out.extend(self.pending.take()),
                _ => return Err(ParseCodeError::InvalidDigit(byte)),
            }
            self.consumed += 1;
        }

        Ok(())
    }

    /// Mark the end of input, returning the last code if it was not yet terminated.
    pub fn finish(&mut self) -> Option<Code> {
        self.pending.take()
    }

    /// The total number of bytes accepted.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Parse a complete code text.
pub fn parse_codes(text: &[u8]) -> Result<Vec<Code>, ParseCodeError> {
    let mut scanner = CodeScanner::new();
    let mut codes = Vec::new();
    scanner.scan(text, &mut codes)?;
    codes.extend(scanner.finish());
    Ok(codes)
}

/// Display adapter writing codes separated by single spaces.
pub struct DisplayCodes<'a>(pub &'a [Code]);

impl fmt::Display for DisplayCodes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes = self.0.iter();
        if let Some(first) = codes.next() {
            write!(f, "{}", first)?;
        }
        for code in codes {
            write!(f, " {}", code)?;
        }
        Ok(())
    }
}

/// Render `codes` into `out`, preceded by a space unless `first` is set.
pub(crate) fn render(codes: &[Code], first: bool, out: &mut Vec<u8>) {
    use core::fmt::Write as _;

    struct Bytes<'a>(&'a mut Vec<u8>);

    impl fmt::Write for Bytes<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.0.extend_from_slice(s.as_bytes());
            Ok(())
        }
    }

    if codes.is_empty() {
        return;
    }

    let mut bytes = Bytes(out);
    if !first {
        bytes.0.push(b' ');
    }
    // Infallible, the sink never reports an error.
    let _ = write!(bytes, "{}", DisplayCodes(codes));
}
