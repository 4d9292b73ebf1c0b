//! Error types for feeds and sinks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A data row that cannot become a [`MarketQuote`](crate::MarketQuote).
///
/// Row errors are recoverable: the row is skipped and the feed moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The row has fewer than four columns.
    #[error("Missing {column} column")]
    MissingField {
        /// Name of the first missing column
        column: &'static str,
    },

    /// A numeric column does not parse as a number.
    #[error("Invalid {column}: '{value}'")]
    InvalidNumber {
        /// Column name
        column: &'static str,
        /// Offending text
        value: String,
    },

    /// The CSV reader could not decode the row.
    #[error("Unreadable row: {0}")]
    Unreadable(String),
}

/// A feed or result file that cannot be read as a whole.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The file could not be opened.
    #[error("Cannot open {path}: {source}")]
    Open {
        /// Path that was tried
        path: PathBuf,
        /// Underlying reader error
        #[source]
        source: csv::Error,
    },

    /// Reading failed part way through.
    #[error("Read error: {0}")]
    Read(#[from] csv::Error),

    /// A required column is absent from the header.
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// A value in a required column does not parse.
    #[error("Line {line}: '{value}' is not a number")]
    InvalidValue {
        /// 1-based line number
        line: u64,
        /// Offending text
        value: String,
    },

    /// Generator parameters are out of range.
    #[error("Invalid generator parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Writing a generated feed failed.
    #[error(transparent)]
    Write(#[from] SinkError),
}

/// Failure to write output rows.
#[derive(Error, Debug)]
pub enum SinkError {
    /// CSV encoding or the underlying writer failed.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Creating or flushing the destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_messages() {
        let err = RowError::InvalidNumber {
            column: "spot",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid spot: 'abc'");
        assert_eq!(
            RowError::MissingField { column: "rate" }.to_string(),
            "Missing rate column"
        );
    }

    #[test]
    fn test_sink_error_from_io() {
        let err: SinkError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert!(err.to_string().contains("disk full"));
    }
}
