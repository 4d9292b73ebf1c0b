//! CSV writer for result rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::error::SinkError;

/// Writes a fixed header followed by serialised rows.
///
/// The header is written on construction, so a run that produces no rows
/// still leaves a well-formed file behind. Rows are serialised with serde
/// in field order and are not checked against the header.
pub struct CsvRecordSink<W: Write> {
    writer: Writer<W>,
    rows: usize,
}

impl CsvRecordSink<File> {
    /// Creates (or truncates) `path` and writes the header.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    /// `SinkError` if the file cannot be created or the header cannot be written.
    pub fn create(path: impl AsRef<Path>, header: &[&str]) -> Result<Self, SinkError> {
        let file = File::create(path.as_ref())?;
        Self::from_writer(file, header)
    }
}

impl<W: Write> CsvRecordSink<W> {
    /// Wraps any writer and writes the header.
    ///
    /// # Errors
    /// `SinkError::Csv` if the header cannot be written.
    pub fn from_writer(writer: W, header: &[&str]) -> Result<Self, SinkError> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
        writer.write_record(header)?;
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one row.
    ///
    /// # Errors
    /// `SinkError::Csv` if serialisation or the underlying write fails.
    pub fn write_row<T: Serialize>(&mut self, row: &T) -> Result<(), SinkError> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, excluding the header.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes buffered rows to the underlying writer.
    ///
    /// # Errors
    /// `SinkError::Io` if the flush fails.
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    /// `SinkError::Io` if the final flush fails.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(io::Error::new(e.error().kind(), e.error().to_string())))
    }
}
