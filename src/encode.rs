//! A module for all encoding needs.
use crate::table::{StringTable, DEFAULT_CAPACITY};
use crate::{Code, BASE_ENTRIES, MAX_ENTRIES};

use alloc::vec::Vec;
use core::iter::FusedIterator;
#[cfg(feature = "std")]
use std::io::{self, BufRead, Write};

#[cfg(feature = "std")]
use crate::{decode::AllResult, text};

/// The encoding state of one code sequence.
///
/// Feed it bytes with [`push`] or [`encode_bytes`] and call [`finish`] once the input is
/// complete to receive the last code. For a slice that is available up front, [`encode`] is a
/// lazy iterator over all codes.
///
/// [`push`]: #method.push
/// [`encode_bytes`]: #method.encode_bytes
/// [`finish`]: #method.finish
/// [`encode`]: #method.encode
pub struct Encoder {
    /// The strings learned so far, seeded with all single bytes.
    table: StringTable,
    /// The longest known string matching the most recent input. Empty before the first byte.
    prefix: Vec<u8>,
    /// The code corresponding to `prefix`.
    current_code: Option<Code>,
    /// The code assigned to the next new string.
    next_code: Code,
    /// If we have emitted the code of the last prefix.
    has_ended: bool,
}

/// A lazy sequence of the codes of a byte slice.
///
/// See [`Encoder::encode`] on how to create this type.
///
/// [`Encoder::encode`]: struct.Encoder.html#method.encode
pub struct Codes<'d> {
    encoder: Encoder,
    bytes: core::slice::Iter<'d, u8>,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
#[cfg(feature = "std")]
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
    /// If a code was written, all further codes need a separator.
    wrote_code: bool,
}

/// An async encoding sink.
///
/// See [`Encoder::into_async`] on how to create this type and more information.
///
/// [`Encoder::into_async`]: struct.Encoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
    wrote_code: bool,
}

impl Encoder {
    /// Create an encoder with a string table of the default size.
    pub fn new() -> Self {
        Encoder::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an encoder whose string table has `capacity` slots.
    ///
    /// A capacity of zero selects the default. Any other capacity is raised to at least 256, so
    /// that every single byte has its code. Tables with fewer slots than the 4096 possible codes
    /// fill up before the code space is exhausted; the encoder then stops learning new strings
    /// early, which costs compression but never correctness.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = match capacity {
            0 => DEFAULT_CAPACITY,
            n => n.max(BASE_ENTRIES),
        };

        Encoder {
            table: StringTable::seeded(capacity),
            prefix: Vec::new(),
            current_code: None,
            next_code: BASE_ENTRIES as Code,
            has_ended: false,
        }
    }

    /// Advance by one input byte, returning the code completed by it.
    ///
    /// Bytes pushed after [`finish`] are ignored.
    ///
    /// [`finish`]: #method.finish
    pub fn push(&mut self, byte: u8) -> Option<Code> {
        if self.has_ended {
            log::debug!("ignoring byte {:#04x} after the end of input", byte);
            return None;
        }

        if self.prefix.is_empty() {
            self.restart(byte);
            return None;
        }

        self.prefix.push(byte);
        if let Some(code) = self.table.lookup(&self.prefix) {
            self.current_code = Some(code);
            return None;
        }

        self.learn_prefix();
        let code = self.current_code.take();
        self.restart(byte);
        code
    }

    /// Encode all of `inp`, appending the completed codes to `out`.
    pub fn encode_bytes(&mut self, inp: &[u8], out: &mut Vec<Code>) {
        out.extend(inp.iter().filter_map(|&byte| self.push(byte)));
    }

    /// Mark the input as complete, returning the code of the remaining prefix.
    ///
    /// Returns `None` for empty input and on any call after the first.
    pub fn finish(&mut self) -> Option<Code> {
        if core::mem::replace(&mut self.has_ended, true) {
            return None;
        }

        self.prefix.clear();
        self.current_code.take()
    }

    /// Lazily encode a complete slice.
    ///
    /// The iterator emits the final code once `data` is exhausted, there is no need to call
    /// [`finish`].
    ///
    /// [`finish`]: #method.finish
    pub fn encode(self, data: &[u8]) -> Codes<'_> {
        Codes {
            encoder: self,
            bytes: data.iter(),
        }
    }

    /// The code that the next newly learned string will receive.
    ///
    /// Starts at 256 and stops growing at 4096, once the code space is exhausted.
    pub fn next_code(&self) -> Code {
        self.next_code
    }

    /// The number of strings in the dictionary, including the single bytes.
    pub fn dictionary_len(&self) -> usize {
        self.table.len()
    }

    /// Construct an encoder into a writer of decimal code text.
    #[cfg(feature = "std")]
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
            wrote_code: false,
        }
    }

    /// Construct an encoder into an async writer of decimal code text.
    #[cfg(feature = "async")]
    pub fn into_async<W: futures::io::AsyncWrite + core::marker::Unpin>(
        &mut self,
        writer: W,
    ) -> IntoAsync<'_, W> {
        IntoAsync {
            encoder: self,
            writer,
            wrote_code: false,
        }
    }

    /// Assign the next code to the current prefix, while the code space lasts.
    fn learn_prefix(&mut self) {
        if usize::from(self.next_code) >= MAX_ENTRIES {
            return;
        }

        self.table.insert(&self.prefix, self.next_code);
        log::trace!("assigned code {} to {} bytes", self.next_code, self.prefix.len());
        self.next_code += 1;

        if usize::from(self.next_code) == MAX_ENTRIES {
            log::debug!("code space exhausted, the dictionary no longer grows");
        }
    }

    fn restart(&mut self, byte: u8) {
        self.prefix.clear();
        self.prefix.push(byte);
        self.current_code = self.table.lookup(&self.prefix);
        if self.current_code.is_none() {
            log::warn!("byte {:#04x} is missing from the string table", byte);
        }
    }

    /// Encode a chunk into code text, or the final code if there is no chunk.
    #[cfg(feature = "std")]
    fn encode_text(&mut self, data: Option<&[u8]>, wrote_code: &mut bool, text: &mut Vec<u8>) {
        let mut codes = Vec::new();
        match data {
            Some(data) => self.encode_bytes(data, &mut codes),
            None => codes.extend(self.finish()),
        }

        text.clear();
        text::render(&codes, !*wrote_code, text);
        *wrote_code |= !codes.is_empty();
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

impl Iterator for Codes<'_> {
    type Item = Code;

    fn next(&mut self) -> Option<Code> {
        for &byte in &mut self.bytes {
            if let Some(code) = self.encoder.push(byte) {
                return Some(code);
            }
        }

        self.encoder.finish()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = usize::from(!self.encoder.has_ended);
        (0, Some(self.bytes.len() + pending))
    }
}

impl FusedIterator for Codes<'_> {}

#[cfg(feature = "std")]
impl<W: Write> IntoStream<'_, W> {
    /// Encode data from a reader.
    ///
    /// This will drain the supplied reader. It will not emit the code of the final prefix, more
    /// data may follow in another call.
    pub fn encode(&mut self, read: impl BufRead) -> AllResult {
        self.encode_part(read, false)
    }

    /// Encode data from a reader and the code of the final prefix.
    pub fn encode_all(mut self, read: impl BufRead) -> AllResult {
        self.encode_part(read, true)
    }

    fn encode_part(&mut self, mut read: impl BufRead, finish: bool) -> AllResult {
        let IntoStream {
            encoder,
            writer,
            wrote_code,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut text = Vec::new();

        let status = (|| -> io::Result<()> {
            loop {
                let data = read.fill_buf()?;
                if data.is_empty() {
                    if finish {
                        encoder.encode_text(None, wrote_code, &mut text);
                        writer.write_all(&text)?;
                        bytes_written += text.len();
                    }
                    break;
                }

                let len = data.len();
                encoder.encode_text(Some(data), wrote_code, &mut text);
                read.consume(len);
                bytes_read += len;

                writer.write_all(&text)?;
                bytes_written += text.len();
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
    /// Encode data from a reader and the code of the final prefix.
    pub async fn encode_all(self, read: impl futures::io::AsyncBufRead) -> AllResult {
        use futures::io::{AsyncBufReadExt, AsyncWriteExt};

        let IntoAsync {
            encoder,
            mut writer,
            mut wrote_code,
        } = self;

        futures::pin_mut!(read);
        let mut bytes_read = 0;
        let mut bytes_written = 0;
        let mut text = Vec::new();

        let status: io::Result<()> = async {
            loop {
                let data = read.fill_buf().await?;
                if data.is_empty() {
                    encoder.encode_text(None, &mut wrote_code, &mut text);
                    writer.write_all(&text).await?;
                    bytes_written += text.len();
                    break;
                }

                let len = data.len();
                encoder.encode_text(Some(data), &mut wrote_code, &mut text);
                read.as_mut().consume(len);
                bytes_read += len;

                writer.write_all(&text).await?;
                bytes_written += text.len();
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
