use std::io;
use std::path::PathBuf;

/// Everything that can abort a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("filename is required")]
    MissingFilename,

    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed csv on line {line}: {reason}")]
    MalformedQuote { line: u64, reason: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("error converting to json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Write(#[source] io::Error),
}

#[cfg(test)]
impl ConvertError {
    /// True for errors raised while validating flags, before touching the file.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingFilename | Self::InvalidDelimiter(_))
    }
}
