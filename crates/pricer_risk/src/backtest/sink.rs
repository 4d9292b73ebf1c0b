//! Destinations for backtest records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use adapter_feeds::{CsvRecordSink, SinkError};

use super::record::{BacktestRecord, RESULT_HEADER};

/// Receives records as the backtest produces them.
///
/// A failing sink aborts the run.
pub trait RecordSink {
    /// Accepts one record.
    fn record(&mut self, record: &BacktestRecord) -> Result<(), SinkError>;

    /// Called once after the last record.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl RecordSink for Vec<BacktestRecord> {
    fn record(&mut self, record: &BacktestRecord) -> Result<(), SinkError> {
        self.push(record.clone());
        Ok(())
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn record(&mut self, record: &BacktestRecord) -> Result<(), SinkError> {
        self.write_row(record)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.flush()
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn record(&mut self, record: &BacktestRecord) -> Result<(), SinkError> {
        (**self).record(record)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// Creates a result file at `path` with the standard header.
///
/// # Errors
/// `SinkError` if the file cannot be created.
pub fn create_result_file(path: impl AsRef<Path>) -> Result<CsvRecordSink<File>, SinkError> {
    CsvRecordSink::create(path, &RESULT_HEADER)
}

/// Wraps a writer as a result sink with the standard header.
///
/// # Errors
/// `SinkError` if the header cannot be written.
pub fn result_writer<W: Write>(writer: W) -> Result<CsvRecordSink<W>, SinkError> {
    CsvRecordSink::from_writer(writer, &RESULT_HEADER)
}
