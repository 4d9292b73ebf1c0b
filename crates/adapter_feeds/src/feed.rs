//! Lazy quote feed over a CSV source.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use pricer_core::types::{MarketQuote, QuoteDate};

use crate::error::{FeedError, RowError};
use crate::layout::FeedLayout;

const COLUMNS: [&str; 4] = ["date", "spot", "rate", "volatility"];

/// Streams [`MarketQuote`]s out of a CSV source, one row at a time.
///
/// The first row is a header and is discarded. Each later row yields its
/// 1-based line number together with either a quote or the [`RowError`] that
/// made it unusable, so the consumer decides whether to skip or stop.
///
/// - Columns beyond the fourth are ignored.
/// - Whitespace around fields is trimmed and blank lines are skipped.
/// - A date that does not parse is not an error; it is carried as
///   [`QuoteDate::Invalid`].
/// - Percentage layouts are divided by 100 here, so every quote leaving the
///   feed is in decimal fractions.
pub struct QuoteFeed<R> {
    records: StringRecordsIntoIter<R>,
    layout: FeedLayout,
    last_line: u64,
}

impl QuoteFeed<File> {
    /// Opens a quote file.
    ///
    /// # Errors
    /// `FeedError::Open` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, layout: FeedLayout) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let reader = reader_builder()
            .from_path(path)
            .map_err(|source| FeedError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), %layout, "quote feed opened");
        Ok(Self::from_csv(reader, layout))
    }
}

impl<R: Read> QuoteFeed<R> {
    /// Wraps any reader, e.g. an in-memory buffer.
    pub fn from_reader(reader: R, layout: FeedLayout) -> Self {
        Self::from_csv(reader_builder().from_reader(reader), layout)
    }

    fn from_csv(reader: csv::Reader<R>, layout: FeedLayout) -> Self {
        Self {
            records: reader.into_records(),
            layout,
            // the header occupies line 1
            last_line: 1,
        }
    }

    /// Layout the feed was opened with.
    #[inline]
    pub fn layout(&self) -> FeedLayout {
        self.layout
    }
}

impl<R: Read> Iterator for QuoteFeed<R> {
    type Item = (usize, Result<MarketQuote, RowError>);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.records.next()?;
        let line = match &item {
            Ok(record) => record.position().map(|p| p.line()),
            Err(err) => err.position().map(|p| p.line()),
        }
        .unwrap_or(self.last_line + 1);
        self.last_line = line;

        let quote = match item {
            Ok(record) => parse_record(&record, self.layout),
            Err(err) => Err(RowError::Unreadable(err.to_string())),
        };
        Some((line as usize, quote))
    }
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(Trim::All);
    builder
}

fn parse_record(record: &StringRecord, layout: FeedLayout) -> Result<MarketQuote, RowError> {
    let field = |index: usize| {
        record
            .get(index)
            .ok_or(RowError::MissingField {
                column: COLUMNS[index],
            })
    };
    let number = |index: usize| -> Result<f64, RowError> {
        let text = field(index)?;
        text.parse::<f64>().map_err(|_| RowError::InvalidNumber {
            column: COLUMNS[index],
            value: text.to_string(),
        })
    };

    let date = QuoteDate::parse(field(0)?);
    let spot = number(1)?;
    let rate = number(2)? / layout.divisor();
    let volatility = number(3)? / layout.divisor();
    Ok(MarketQuote::new(date, spot, rate, volatility))
}
