//! # adapter_feeds: Market Data In, Results Out
//!
//! ## Adapter Layer Role
//!
//! adapter_feeds sits at the edge of the workspace and turns files into
//! typed values and back:
//! - [`QuoteFeed`]: lazily parses a quote CSV in one of two [`FeedLayout`]s
//! - [`CsvRecordSink`]: writes a header and serialisable rows to CSV
//! - [`SyntheticFeed`]: generates reproducible quote files
//! - [`read_hedging_errors`]: reads the error column back out of a result file
//!
//! Nothing here prices or hedges; the pricer layer consumes the quotes.
//!
//! ## Usage Examples
//!
//! ```rust
//! use adapter_feeds::{FeedLayout, QuoteFeed};
//!
//! let csv = "DATE,PX_LAST,US_TREASURY_3M,VOLATILITY_30D\n2023-06-01,155.0,5.0,20.0\n";
//! let mut feed = QuoteFeed::from_reader(csv.as_bytes(), FeedLayout::Percentage);
//!
//! let (line, quote) = feed.next().unwrap();
//! let quote = quote.unwrap();
//! assert_eq!(line, 2);
//! assert_eq!(quote.rate, 0.05);
//! assert_eq!(quote.volatility, 0.2);
//! assert!(feed.next().is_none());
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod feed;
pub mod layout;
pub mod results;
pub mod sink;
pub mod synthetic;

pub use error::{FeedError, RowError, SinkError};
pub use feed::QuoteFeed;
pub use layout::FeedLayout;
pub use pricer_core::types::MarketQuote;
pub use results::{read_hedging_errors, read_hedging_errors_from};
pub use sink::CsvRecordSink;
pub use synthetic::{SpotProcess, SyntheticFeed};
