use crate::error::ConvertError;
use crate::{ApplicationOptions, Config};
use clap::Parser;
use log::info;
use std::ffi::OsString;

const VALUE_FLAGS: [&str; 4] = ["filename", "delimiter", "prefix", "indent"];
const SWITCH_FLAGS: [&str; 3] = ["with-header", "help", "version"];

impl Default for ApplicationOptions {
    fn default() -> Self {
        Self {
            filename: None,
            delimiter: ",".to_owned(),
            prefix: String::new(),
            indent: "    ".to_owned(),
            with_header: false,
        }
    }
}

impl TryFrom<ApplicationOptions> for Config {
    type Error = ConvertError;

    fn try_from(options: ApplicationOptions) -> Result<Self, Self::Error> {
        let filename = options.filename.ok_or(ConvertError::MissingFilename)?;
        let delimiter = parse_delimiter(&options.delimiter)?;

        Ok(Config {
            filename,
            delimiter,
            prefix: options.prefix,
            indent: options.indent,
            with_header: options.with_header,
        })
    }
}

/// Accepts exactly one ascii character that can separate csv fields.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConvertError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\r' | '\n') => Ok(c as u8),
        _ => Err(ConvertError::InvalidDelimiter(raw.to_owned())),
    }
}

/// Rewrites single dash long flags (`-filename x`, `-with-header=true`) into
/// the double dash form clap understands. Values following a flag are left
/// untouched, so `-prefix -indent` keeps `-indent` as the prefix.
pub fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut expects_value = false;

    for arg in args {
        if expects_value {
            expects_value = false;
            normalized.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|text| {
            let body = text.strip_prefix("--").or_else(|| text.strip_prefix('-'))?;
            let (name, inline_value) = match body.split_once('=') {
                Some((name, _)) => (name, true),
                None => (body, false),
            };
            if VALUE_FLAGS.contains(&name) {
                expects_value = !inline_value;
            } else if !SWITCH_FLAGS.contains(&name) {
                return None;
            }
            Some(OsString::from(format!("--{body}")))
        });

        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}

pub fn arg_parse() -> ApplicationOptions {
    env_logger::init();

    let cli = ApplicationOptions::parse_from(normalize_flags(std::env::args_os()));

    info!("Parsed following arguments: ");
    info!("{:?}", &cli);
    cli
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> ApplicationOptions {
        let args = std::iter::once("csv2json").chain(args.iter().copied()).map(OsString::from);
        ApplicationOptions::try_parse_from(normalize_flags(args)).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = parse(&[]);
        assert_eq!(options.delimiter, ",");
        assert_eq!(options.prefix, "");
        assert_eq!(options.indent, "    ");
        assert!(!options.with_header);
        assert!(options.filename.is_none());
    }

    #[test]
    fn single_dash_flags_are_accepted() {
        let options = parse(&["-filename", "in.csv", "-delimiter", ";", "-with-header"]);
        assert_eq!(options.filename, Some(PathBuf::from("in.csv")));
        assert_eq!(options.delimiter, ";");
        assert!(options.with_header);
    }

    #[test]
    fn boolean_flag_takes_inline_value() {
        assert!(parse(&["-with-header=true"]).with_header);
        assert!(!parse(&["--with-header=false"]).with_header);
    }

    #[test]
    fn flag_values_starting_with_dash_are_kept() {
        let options = parse(&["-prefix", "-indent", "-indent=--", "-filename", "-data.csv"]);
        assert_eq!(options.prefix, "-indent");
        assert_eq!(options.indent, "--");
        assert_eq!(options.filename, Some(PathBuf::from("-data.csv")));
    }

    #[test]
    fn unknown_arguments_pass_through() {
        let args = ["prog", "-x", "plain"].map(OsString::from);
        assert_eq!(normalize_flags(args.clone()), args.to_vec());
    }

    #[test]
    fn missing_filename_is_a_configuration_error() {
        let err = Config::try_from(ApplicationOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingFilename));
        assert!(err.is_configuration());
    }

    #[test]
    fn delimiter_must_be_one_character() {
        for bad in ["", ",,", "ab", "é", "\"", "\n"] {
            let err = parse_delimiter(bad).unwrap_err();
            assert!(err.is_configuration(), "{bad:?} should be rejected");
        }
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
    }

    #[test]
    fn config_carries_validated_options() {
        let options = ApplicationOptions {
            filename: Some(PathBuf::from("data.csv")),
            delimiter: ";".to_owned(),
            prefix: ">".to_owned(),
            indent: "\t".to_owned(),
            with_header: true,
        };
        let config = Config::try_from(options).unwrap();
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.prefix, ">");
        assert_eq!(config.indent, "\t");
        assert!(config.with_header);
    }
}
