//! Backtest error types.

use std::path::PathBuf;

use adapter_feeds::{FeedError, SinkError};
use thiserror::Error;

/// Failures that end a backtest run.
///
/// Bad rows are not errors; they are reported as skipped in the
/// [`BacktestReport`](super::BacktestReport).
#[derive(Debug, Error)]
pub enum BacktestError {
    /// The quote source could not be opened. No records were produced.
    #[error("Quote source unavailable: {path}")]
    SourceUnavailable {
        /// Path that was tried
        path: PathBuf,
        /// Why opening failed
        #[source]
        source: FeedError,
    },

    /// A record could not be written.
    #[error("Record sink failed: {0}")]
    Sink(#[from] SinkError),

    /// A quote was offered to a session that has already stopped.
    #[error("Hedge session already finished")]
    SessionFinished,
}
