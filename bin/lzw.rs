#![forbid(unsafe_code)]
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::{env, ffi, fs, process};

use lzwtab::{decode::Decoder, encode::Encoder, text};

fn main() -> CodingResult {
    env_logger::init();
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(|ParamError| explain());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> Result<(), io::Error> {
    let out = io::stdout();
    let out = out.lock();

    let operation = match flags.operation {
        Some(operation) => operation,
        None if flags.file.is_none() => {
            let stdin = io::stdin();
            return interactive(stdin.lock(), out);
        }
        None => return explain(),
    };

    let input: Box<dyn BufRead> = match flags.file {
        Some(Input::File(file)) => {
            let data = fs::File::open(file)?;
            Box::new(io::BufReader::with_capacity(1 << 20, data))
        }
        Some(Input::Stdin) | None => Box::new(io::BufReader::with_capacity(1 << 20, io::stdin())),
    };

    match operation {
        Operation::Encode => {
            let mut out = out;
            let mut encoder = Encoder::new();
            encoder.into_stream(&mut out).encode_all(input).status?;
            writeln!(out)
        }
        Operation::Decode => {
            let mut decoder = Decoder::new();
            decoder.into_stream(out).decode_all(input).status
        }
    }
}

/// The menu driven mode, reading one selection and one line of input.
fn interactive(mut input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    prompt(&mut output, "To compress, press 1. To decompress, press 2: ")?;
    let selection = read_line(&mut input)?;
    let selection = String::from_utf8_lossy(&selection);

    match leading_integer(&selection) {
        Some(1) => {
            prompt(&mut output, "Enter the input string: ")?;
            let data = read_line(&mut input)?;
            let codes = lzwtab::encode(&data);
            writeln!(output, "Compressed output: {}", text::DisplayCodes(&codes))
        }
        Some(2) => {
            prompt(&mut output, "Enter the compressed string: ")?;
            let line = read_line(&mut input)?;
            let codes = text::parse_codes(&line)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

            write!(output, "Decompressed string: ")?;
            match lzwtab::decode(&codes) {
                Ok(data) => {
                    output.write_all(&data)?;
                    writeln!(output)
                }
                Err(err) => {
                    output.write_all(err.partial())?;
                    writeln!(output)?;
                    Err(io::Error::new(io::ErrorKind::InvalidData, err))
                }
            }
        }
        Some(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid option selected. Please run again and enter 1 or 2.",
        )),
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid input. Please enter 1 or 2.",
        )),
    }
}

fn prompt(output: &mut impl Write, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes())?;
    output.flush()
}

/// Read one line without its `\n`. Any other byte, a `\r` included, is input.
fn read_line(input: &mut impl BufRead) -> io::Result<Vec<u8>> {
    let mut line = vec![];
    input.read_until(b'\n', &mut line)?;
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    Ok(line)
}

/// The signed decimal number at the start of `line`, after leading whitespace.
///
/// Whatever follows the digits is ignored, so `"1 please"` selects 1.
fn leading_integer(line: &str) -> Option<i64> {
    let line = line.trim_start();
    let end = line
        .char_indices()
        .find(|&(idx, ch)| !(ch.is_ascii_digit() || (idx == 0 && (ch == '+' || ch == '-'))))
        .map_or(line.len(), |(idx, _)| idx);
    line[..end].parse().ok()
}

struct Flags {
    file: Option<Input>,
    operation: Option<Operation>,
}

struct ParamError;

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Encode,
    Decode,
}

fn explain<T>() -> T {
    println!(
        "Usage: lzw [-e|-d] [<file>]\n\
        Arguments:\n\
        -e\t operation encode, writes codes separated by spaces\n\
        -d\t operation decode, reads codes separated by whitespace\n\
        <file>\tfilepath or '-' for stdin (default)\n\
        Without an operation the input is read interactively."
    );
    process::exit(1);
}

fn command() -> clap::Command<'static> {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between bytes and 12-bit LZW codes")
        .arg(
            clap::Arg::new("decode")
                .short('d')
                .long("decode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("encode")
                .short('e')
                .long("encode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(clap::Arg::new("file").value_parser(clap::builder::ValueParser::path_buf()))
}

impl Flags {
    fn from_args(mut args: impl Iterator<Item = ffi::OsString>) -> Result<Self, ParamError> {
        let matches = command().get_matches_from(args.by_ref());
        let flag = |id: &str| matches.get_one::<bool>(id).copied().unwrap_or(false);

        let operation = match (flag("encode"), flag("decode")) {
            (true, true) => return Err(ParamError),
            (true, false) => Some(Operation::Encode),
            (false, true) => Some(Operation::Decode),
            (false, false) => None,
        };

        let file = match matches.get_one::<PathBuf>("file") {
            None => None,
            Some(p) if *p == PathBuf::from("-") => Some(Input::Stdin),
            Some(p) => Some(Input::File(p.clone())),
        };

        Ok(Flags { file, operation })
    }
}

enum CodingResult {
    Ok,
    Err(io::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), io::Error>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("Error: {}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{interactive, leading_integer};
    use std::io;

    fn run(input: &[u8]) -> (io::Result<()>, String) {
        let mut output = vec![];
        let result = interactive(input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn compress() {
        let (result, output) = run(b"1\nbanana\n");
        assert!(result.is_ok());
        assert_eq!(
            output,
            "To compress, press 1. To decompress, press 2: \
             Enter the input string: \
             Compressed output: 98 97 110 257 97\n"
        );
    }

    #[test]
    fn decompress() {
        let (result, output) = run(b"2\r\n98 97 110 257 97\r\n");
        assert!(result.is_ok());
        assert!(output.ends_with("Decompressed string: banana\n"), "{}", output);
    }

    #[test]
    fn decompress_invalid_code() {
        let (result, output) = run(b"2\n65 9999\n");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert!(output.ends_with("Decompressed string: A\n"), "{}", output);
    }

    #[test]
    fn unparseable_codes() {
        let (result, _) = run(b"2\n65 sixty\n");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn selection_ignores_trailing_text() {
        let (result, output) = run(b"  1 extra\nabab\n");
        assert!(result.is_ok());
        assert!(output.ends_with("Compressed output: 97 98 256\n"), "{}", output);

        assert_eq!(leading_integer("2\r"), Some(2));
        assert_eq!(leading_integer("+1x"), Some(1));
        assert_eq!(leading_integer("-3"), Some(-3));
        assert_eq!(leading_integer("x1"), None);
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer(""), None);
    }

    #[test]
    fn carriage_return_is_input() {
        let (result, output) = run(b"1\r\nab\r\n");
        assert!(result.is_ok());
        assert!(output.ends_with("Compressed output: 97 98 13\n"), "{}", output);
    }

    #[test]
    fn invalid_selection() {
        let (result, _) = run(b"3\n");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
        let (result, _) = run(b"compress\n");
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
