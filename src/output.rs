use crate::error::ConvertError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::io::{self, Write};

/// Rows of a csv file in file order.
pub type Table = Vec<Vec<String>>;

/// One csv row keyed by the header names.
pub type Record = Map<String, Value>;

/// The document handed to the json serializer.
///
/// Which variant is produced is decided once, from the header flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// Every row as a list of fields.
    Rows(Table),
    /// One object per data row.
    Records(Vec<Record>),
}

impl Output {
    pub fn len(&self) -> usize {
        match self {
            Output::Rows(rows) => rows.len(),
            Output::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes `prefix` after every line break that passes through it.
///
/// Json strings escape their line breaks, so every raw `\n` in serializer
/// output is a structural one.
struct LinePrefixer<'a, W> {
    inner: W,
    prefix: &'a [u8],
}

impl<W: Write> Write for LinePrefixer<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for chunk in buf.split_inclusive(|&byte| byte == b'\n') {
            self.inner.write_all(chunk)?;
            if chunk.ends_with(b"\n") {
                self.inner.write_all(self.prefix)?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Renders `output` as indented json.
///
/// Each nested element starts on a new line made of `prefix` followed by one
/// `indent` per level. The first line carries no prefix and there is no
/// trailing newline.
pub fn to_json(output: &Output, prefix: &str, indent: &str) -> Result<Vec<u8>, ConvertError> {
    let mut buffer = Vec::new();
    let writer = LinePrefixer {
        inner: &mut buffer,
        prefix: prefix.as_bytes(),
    };
    let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(indent.as_bytes()));
    output.serialize(&mut serializer)?;
    Ok(buffer)
}
