//! A module for all decoding needs.
use crate::table::CodeTable;
use crate::{Code, BASE_ENTRIES, MAX_ENTRIES};

use alloc::vec::Vec;
#[cfg(feature = "std")]
use crate::text::CodeScanner;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

/// The decoding state of one code sequence.
///
/// The decoder may be fed the codes in chunks of any size. After the first invalid code it
/// refuses all further input with the same error.
pub struct Decoder {
    /// The table of decoded codes.
    table: CodeTable,
    /// The expansion of the preceding code, `None` before the first code.
    previous: Option<Vec<u8>>,
    /// The code the next derived string is stored under.
    next_code: Code,
    /// The error that stopped decoding, if any.
    error: Option<LzwError>,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type and more information.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
    scanner: CodeScanner,
}

/// An async decoding sink.
///
/// See [`Decoder::into_async`] on how to create this type and more information.
///
/// [`Decoder::into_async`]: struct.Decoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
    scanner: CodeScanner,
}

/// The result of a coding operation on a pair of buffer.
#[must_use = "Contains a status with potential error information"]
#[derive(Debug)]
pub struct StreamResult {
    /// The number of codes accepted from the input.
    pub consumed_in: usize,
    /// The number of bytes appended to the output.
    pub consumed_out: usize,
    /// The status after returning from the coding call.
    pub status: Result<(), LzwError>,
}

/// The result of coding into an output stream.
#[cfg(feature = "std")]
#[must_use = "Contains a status with potential error information"]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Note that when writing into streams it is not in general possible to recover from an
    /// error.
    pub status: std::io::Result<()>,
}

/// The error kind after an invalid code has been encountered.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LzwError {
    /// The first code of a sequence does not stand for a single byte.
    #[error("invalid start code {0}, the first code must stand for a single byte")]
    InvalidStartCode(Code),
    /// The code was neither assigned yet nor the next code to be assigned.
    #[error("invalid code {0}, it was neither assigned nor the next code")]
    InvalidCode(Code),
}

/// A failed decoding together with the output decoded before the failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{error} after {} decoded bytes", .partial.len())]
pub struct DecodeError {
    error: LzwError,
    partial: Vec<u8>,
}

impl Decoder {
    /// Create a new decoder with a freshly seeded table.
    pub fn new() -> Self {
        Decoder {
            table: CodeTable::seeded(),
            previous: None,
            next_code: BASE_ENTRIES as Code,
            error: None,
        }
    }

    /// Decode some codes from `inp`, appending the bytes to `out`.
    ///
    /// Decoding stops at the first invalid code. All bytes decoded before it stay in `out` and
    /// `consumed_in` counts the valid codes only.
    pub fn decode_codes(&mut self, inp: &[Code], out: &mut Vec<u8>) -> StreamResult {
        let o_out = out.len();
        let mut consumed_in = 0;
        let mut status = match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        };

        if status.is_ok() {
            for &code in inp {
                if let Err(err) = self.decode_code(code, out) {
                    log::debug!("decoding stopped after {} codes: {}", consumed_in, err);
                    self.error = Some(err);
                    status = Err(err);
                    break;
                }
                consumed_in += 1;
            }
        }

        StreamResult {
            consumed_in,
            consumed_out: out.len() - o_out,
            status,
        }
    }

    /// The code under which the next derived string will be stored.
    pub fn next_code(&self) -> Code {
        self.next_code
    }

    /// Construct a decoder of decimal code text into a writer.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            decoder: self,
            writer,
            scanner: CodeScanner::new(),
        }
    }

    /// Construct a decoder of decimal code text into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite + core::marker::Unpin>(
        &mut self,
        writer: W,
    ) -> IntoAsync<'_, W> {
        IntoAsync {
            decoder: self,
            writer,
            scanner: CodeScanner::new(),
        }
    }

    fn decode_code(&mut self, code: Code, out: &mut Vec<u8>) -> Result<(), LzwError> {
        let mut previous = match self.previous.take() {
            Some(previous) => previous,
            None => {
                let first = match self.table.get(code) {
                    Some(first) if usize::from(code) < BASE_ENTRIES => first.to_vec(),
                    _ => return Err(LzwError::InvalidStartCode(code)),
                };
                out.extend_from_slice(&first);
                self.previous = Some(first);
                return Ok(());
            }
        };

        let current = match self.table.get(code) {
            Some(known) if code < self.next_code => known.to_vec(),
            // The encoder is one entry ahead: it emits the string it has just learned, which is
            // the previous string extended by its own first byte. With a full table this still
            // holds for 4096, which then names no entry.
            _ if code == self.next_code => {
                let mut current = previous.clone();
                current.push(previous[0]);
                current
            }
            _ => {
                self.previous = Some(previous);
                return Err(LzwError::InvalidCode(code));
            }
        };

        out.extend_from_slice(&current);
        if usize::from(self.next_code) < MAX_ENTRIES {
            previous.push(current[0]);
            self.table.set(self.next_code, previous);
            self.next_code += 1;
        }

        self.previous = Some(current);
        Ok(())
    }

    /// Decode a chunk of code text, or the pending code if there is no chunk, into `out`.
    ///
    /// The bytes of all codes before a malformed or invalid one are in `out` even on error.
    #[cfg(feature = "std")]
    fn decode_text(
        &mut self,
        scanner: &mut CodeScanner,
        data: Option<&[u8]>,
        out: &mut Vec<u8>,
    ) -> io::Result<()> {
        let mut codes = Vec::new();
        let scanned = match data {
            Some(data) => scanner.scan(data, &mut codes),
            None => {
                codes.extend(scanner.finish());
                Ok(())
            }
        };

        out.clear();
        self.decode_codes(&codes, out).status.map_err(invalid_data)?;
        scanned.map_err(invalid_data)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl DecodeError {
    pub(crate) fn new(error: LzwError, partial: Vec<u8>) -> Self {
        DecodeError { error, partial }
    }

    /// The invalid code that stopped decoding.
    pub fn error(&self) -> LzwError {
        self.error
    }

    /// The bytes decoded before the invalid code.
    pub fn partial(&self) -> &[u8] {
        &self.partial
    }

    /// Take the bytes decoded before the invalid code.
    pub fn into_partial(self) -> Vec<u8> {
        self.partial
    }
}

#[cfg(feature = "std")]
fn invalid_data<E>(err: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, W> {
    /// Decode code text from a reader.
    ///
    /// This will drain the supplied reader. A number at the very end of the input is not
    /// decoded, it may continue in another call.
    pub fn decode(&mut self, read: impl BufRead) -> AllResult {
        self.decode_part(read, false)
    }

    /// Decode all code text from a reader, including a number at the very end.
    pub fn decode_all(mut self, read: impl BufRead) -> AllResult {
        self.decode_part(read, true)
    }

    fn decode_part(&mut self, mut read: impl BufRead, finish: bool) -> AllResult {
        let IntoStream {
            decoder,
            writer,
            scanner,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut outbuf = Vec::new();

        let status = (|| -> io::Result<()> {
            loop {
                let data = read.fill_buf()?;
                if data.is_empty() {
                    if finish {
                        let decoded = decoder.decode_text(scanner, None, &mut outbuf);
                        writer.write_all(&outbuf)?;
                        bytes_written += outbuf.len();
                        decoded?;
                    }
                    break;
                }

                let len = data.len();
                let before = scanner.consumed();
                let decoded = decoder.decode_text(scanner, Some(data), &mut outbuf);
                let accepted = scanner.consumed() - before;
                read.consume(len);
                bytes_read += accepted;

                writer.write_all(&outbuf)?;
                bytes_written += outbuf.len();
                decoded?;
            }

            writer.flush()
        })();

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

#[cfg(feature = "async")]
impl<W: futures::io::AsyncWrite + core::marker::Unpin> IntoAsync<'_, W> {
    /// Decode all code text from a reader, including a number at the very end.
    pub async fn decode_all(self, read: impl futures::io::AsyncBufRead) -> AllResult {
        use futures::io::{AsyncBufReadExt, AsyncWriteExt};

        let IntoAsync {
            decoder,
            mut writer,
            mut scanner,
        } = self;

        futures::pin_mut!(read);
        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut outbuf = Vec::new();

        let status: io::Result<()> = async {
            loop {
                let data = read.fill_buf().await?;
                if data.is_empty() {
                    let decoded = decoder.decode_text(&mut scanner, None, &mut outbuf);
                    writer.write_all(&outbuf).await?;
                    bytes_written += outbuf.len();
                    decoded?;
                    break;
                }

                let len = data.len();
                let before = scanner.consumed();
                let decoded = decoder.decode_text(&mut scanner, Some(data), &mut outbuf);
                let accepted = scanner.consumed() - before;
                read.as_mut().consume(len);
                bytes_read += accepted;

                writer.write_all(&outbuf).await?;
                bytes_written += outbuf.len();
                decoded?;
            }

            writer.flush().await
        }
        .await;

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}
