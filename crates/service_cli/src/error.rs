//! CLI error types

use adapter_feeds::{FeedError, SinkError};
use pricer_core::types::{DateError, PricingError};
use pricer_risk::BacktestError;
use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// A named input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line value is out of range or unknown.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A pricing model could not be built.
    #[error("Model setup failed: {0}")]
    Model(String),

    /// A backtest failed.
    #[error("Backtest failed: {0}")]
    Backtest(#[from] BacktestError),

    /// A quote or result file could not be read.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// A result file could not be written.
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    /// One-off pricing failed.
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),

    /// A date argument did not parse.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Filesystem failure outside the feeds.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
