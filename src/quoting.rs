//! Strict quote checking over the raw bytes of a csv file.
//!
//! The `csv` reader accepts stray quotes and unterminated quoted fields
//! without complaint. A file that breaks the quoting rules is rejected here
//! before any row is extracted.

use crate::error::ConvertError;

const BARE_QUOTE: &str = "bare quote in non-quoted field";
const EXTRANEOUS_QUOTE: &str = "extraneous or missing quote in quoted field";
const UNTERMINATED: &str = "unterminated quoted field";

#[derive(Clone, Copy, Debug)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Scans `data` and fails on the first quoting violation.
///
/// The reported line is 1-based. For an unterminated field it is the line
/// where the field was opened.
pub fn check_quoting(data: &[u8], delimiter: u8) -> Result<(), ConvertError> {
    let mut state = State::FieldStart;
    let mut line: u64 = 1;
    let mut opened_on: u64 = 1;

    for &byte in data {
        let ends_field = byte == delimiter || byte == b'\n' || byte == b'\r';
        state = match state {
            State::FieldStart if byte == b'"' => {
                opened_on = line;
                State::Quoted
            }
            State::Unquoted if byte == b'"' => return Err(malformed(line, BARE_QUOTE)),
            State::FieldStart | State::Unquoted if ends_field => State::FieldStart,
            State::FieldStart | State::Unquoted => State::Unquoted,
            State::Quoted if byte == b'"' => State::QuoteInQuoted,
            State::Quoted => State::Quoted,
            // doubled quote is an escaped quote
            State::QuoteInQuoted if byte == b'"' => State::Quoted,
            State::QuoteInQuoted if ends_field => State::FieldStart,
            State::QuoteInQuoted => return Err(malformed(line, EXTRANEOUS_QUOTE)),
        };
        if byte == b'\n' {
            line += 1;
        }
    }

    match state {
        State::Quoted => Err(malformed(opened_on, UNTERMINATED)),
        _ => Ok(()),
    }
}

fn malformed(line: u64, reason: &'static str) -> ConvertError {
    ConvertError::MalformedQuote { line, reason }
}
