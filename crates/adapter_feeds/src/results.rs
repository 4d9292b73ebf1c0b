//! Reading result files back in.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::FeedError;

/// Column holding the per-row hedging error in a result file.
pub const HEDGING_ERROR_COLUMN: &str = "HedgingError";

/// Reads the hedging-error column of a result CSV, in file order.
///
/// # Errors
/// `FeedError::Open` if the file cannot be opened, otherwise as
/// [`read_hedging_errors_from`].
pub fn read_hedging_errors(path: impl AsRef<Path>) -> Result<Vec<f64>, FeedError> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| FeedError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    collect_errors(reader)
}

/// Reads the hedging-error column from any reader.
///
/// # Errors
/// `FeedError::MissingColumn` if the header has no `HedgingError` column,
/// `FeedError::InvalidValue` if a value does not parse,
/// `FeedError::Read` for malformed CSV.
pub fn read_hedging_errors_from<R: Read>(reader: R) -> Result<Vec<f64>, FeedError> {
    collect_errors(ReaderBuilder::new().trim(Trim::All).from_reader(reader))
}

fn collect_errors<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<f64>, FeedError> {
    let column = reader
        .headers()?
        .iter()
        .position(|name| name == HEDGING_ERROR_COLUMN)
        .ok_or_else(|| FeedError::MissingColumn(HEDGING_ERROR_COLUMN.to_string()))?;

    let mut errors = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let text = record.get(column).unwrap_or_default();
        let value = text.parse::<f64>().map_err(|_| FeedError::InvalidValue {
            line,
            value: text.to_string(),
        })?;
        errors.push(value);
    }
    Ok(errors)
}
