//! File round trips through the feed, the sink and the generator.

use adapter_feeds::{
    read_hedging_errors, CsvRecordSink, FeedError, FeedLayout, QuoteFeed, SyntheticFeed,
};
use pricer_core::types::Date;
use serde::Serialize;
use tempfile::tempdir;

#[test]
fn test_generated_walk_reads_back_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("walk.csv");
    let feed = SyntheticFeed::walk(Date::from_ymd(2023, 1, 1).unwrap(), 400.0, 0.15).with_days(30);
    feed.write_path(&path).unwrap();

    let read: Vec<_> = QuoteFeed::open(&path, FeedLayout::Standard)
        .unwrap()
        .map(|(_, quote)| quote.unwrap())
        .collect();
    assert_eq!(read, feed.quotes().unwrap());
}

#[test]
fn test_generated_export_reads_back_in_decimal_units() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let feed = SyntheticFeed::terminal_export(Date::from_ymd(2023, 6, 1).unwrap());
    feed.write_path(&path).unwrap();

    let quotes: Vec<_> = QuoteFeed::open(&path, feed.layout())
        .unwrap()
        .map(|(_, quote)| quote.unwrap())
        .collect();
    assert_eq!(quotes.len(), 100);
    assert!(quotes.iter().all(|q| q.rate == 0.05 && q.volatility == 0.2));
    assert_eq!(quotes, feed.quotes().unwrap());
}

#[derive(Serialize)]
struct ResultRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "HedgingError")]
    hedging_error: f64,
}

#[test]
fn test_sink_output_feeds_error_reader() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.csv");

    let mut sink = CsvRecordSink::create(&path, &["Date", "HedgingError"]).unwrap();
    for (day, error) in [(1, 0.0), (2, 0.125), (3, -0.75)] {
        sink.write_row(&ResultRow {
            date: format!("2024-06-0{}", day),
            hedging_error: error,
        })
        .unwrap();
    }
    sink.flush().unwrap();
    drop(sink);

    assert_eq!(read_hedging_errors(&path).unwrap(), vec![0.0, 0.125, -0.75]);
}

#[test]
fn test_missing_result_file() {
    let dir = tempdir().unwrap();
    let result = read_hedging_errors(dir.path().join("absent.csv"));
    assert!(matches!(result, Err(FeedError::Open { .. })));
}
