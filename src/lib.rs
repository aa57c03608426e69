use crate::parsing::arg_parse;
use clap::{ArgAction, Parser};
use color_eyre::eyre::Result;
use csv::ReaderBuilder;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use crate::error::ConvertError;
pub use crate::output::{to_json, Output, Record, Table};
pub use crate::parsing::{normalize_flags, parse_delimiter};

mod error;
mod output;
mod parsing;
mod quoting;

#[derive(Parser, Debug, Clone)]
#[clap(name = "csv2json")]
#[clap(version = "0.1")]
#[clap(about = "Converts a csv file to json", long_about = None)]
pub struct ApplicationOptions {
    /// Name of the CSV file to convert to JSON
    #[clap(long, allow_hyphen_values = true)]
    pub filename: Option<PathBuf>,

    /// Delimiter character in the CSV
    #[clap(long, default_value = ",", allow_hyphen_values = true)]
    pub delimiter: String,

    /// Prefix on each line in the resulting JSON
    #[clap(long, default_value = "", allow_hyphen_values = true)]
    pub prefix: String,

    /// Indentation in the resulting JSON
    #[clap(long, default_value = "    ", allow_hyphen_values = true)]
    pub indent: String,

    /// Does the CSV file have a header? Produces an object per record if true, a list per record if false
    #[clap(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub with_header: bool,
}

/// Validated settings for one run. Built once from the command line and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub filename: PathBuf,
    pub delimiter: u8,
    pub prefix: String,
    pub indent: String,
    pub with_header: bool,
}

/// Parses csv bytes into rows. Rows may differ in length and empty lines
/// are skipped. Bytes that are not valid utf-8 become U+FFFD.
pub fn parse_table(data: &[u8], delimiter: u8) -> Result<Table, ConvertError> {
    quoting::check_quoting(data, delimiter)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data);

    rdr.byte_records()
        .map(|record| -> Result<Vec<String>, ConvertError> {
            Ok(record?
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect())
        })
        .collect()
}

pub fn read_table(path: &Path, delimiter: u8) -> Result<Table, ConvertError> {
    let data = fs::read(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&data, delimiter)
}

/// Pairs one data row with the header names.
///
/// Fields missing at the end of the row become empty strings, fields past
/// the last header are dropped.
pub fn convert_line(headers: &[String], row: &[String]) -> Record {
    let mut line = Record::new();

    for (i, header_name) in headers.iter().enumerate() {
        let value = row.get(i).map_or("", String::as_str);
        line.insert(header_name.to_string(), Value::String(value.to_string()));
    }

    line
}

/// Takes the first row of `table` as the header and turns every remaining
/// row into a record. An empty table yields no records.
pub fn to_records(table: Table) -> Vec<Record> {
    let mut rows = table.into_iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };

    rows.map(|row| convert_line(&headers, &row)).collect()
}

pub fn convert(path: &Path, delimiter: u8, with_header: bool) -> Result<Output, ConvertError> {
    let table = read_table(path, delimiter)?;
    debug!("read {} rows from {}", table.len(), path.display());

    let output = if with_header {
        Output::Records(to_records(table))
    } else {
        Output::Rows(table)
    };
    if output.is_empty() {
        debug!("no data rows in {}", path.display());
    } else {
        debug!("converted {} entries", output.len());
    }

    Ok(output)
}

/// Converts the configured file and writes the json, newline terminated,
/// to `out`. Nothing is written unless the whole document rendered.
pub fn write_converted<W: Write>(config: &Config, out: &mut W) -> Result<(), ConvertError> {
    let output = convert(&config.filename, config.delimiter, config.with_header)?;
    let json = to_json(&output, &config.prefix, &config.indent)?;

    out.write_all(&json)
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
        .map_err(ConvertError::Write)
}

pub fn run_by_config(config: Config) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_converted(&config, &mut handle)?;
    Ok(())
}

pub fn run() -> Result<()> {
    let options: ApplicationOptions = arg_parse();
    let config = Config::try_from(options)?;
    run_by_config(config)
}
