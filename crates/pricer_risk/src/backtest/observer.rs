//! Progress reporting for backtest runs.

use std::path::Path;

use adapter_feeds::FeedError;
use pricer_core::types::QuoteDate;
use pricer_models::instruments::OptionContract;

use super::backtester::{BacktestReport, SkipReason};
use super::record::BacktestRecord;

/// Hooks called as a backtest progresses. Every method defaults to doing
/// nothing, so implementors pick the events they care about.
pub trait BacktestObserver {
    /// A run is starting.
    fn on_start(&self, _model: &str, _contract: &OptionContract) {}

    /// A record was produced from the row at `line`.
    fn on_record(&self, _line: usize, _record: &BacktestRecord) {}

    /// The row at `line` was skipped.
    fn on_skip(&self, _line: usize, _reason: &SkipReason) {}

    /// The row at `line` is dated after expiry; the run stops.
    fn on_expiry_passed(&self, _line: usize, _date: &QuoteDate) {}

    /// The source at `path` could not be opened.
    fn on_source_unavailable(&self, _path: &Path, _error: &FeedError) {}

    /// The run finished normally.
    fn on_finish(&self, _report: &BacktestReport) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl BacktestObserver for NullObserver {}

/// Forwards events to `tracing`.
///
/// Run boundaries log at `info`, skipped rows and defaulted dates at
/// `warn`, individual records at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BacktestObserver for TracingObserver {
    fn on_start(&self, model: &str, contract: &OptionContract) {
        tracing::info!(
            model,
            strike = contract.strike(),
            expiry = %contract.expiry(),
            kind = contract.kind(),
            "backtest started"
        );
    }

    fn on_record(&self, line: usize, record: &BacktestRecord) {
        if record.date().as_date().is_none() {
            tracing::warn!(
                line,
                date = %record.date(),
                "unparseable date, time to expiry defaulted to zero"
            );
        }
        tracing::trace!(
            line,
            date = %record.date(),
            price = record.fair_value(),
            delta = record.delta(),
            hedging_error = record.hedging_error(),
            "hedged"
        );
    }

    fn on_skip(&self, line: usize, reason: &SkipReason) {
        tracing::warn!(line, %reason, "row skipped");
    }

    fn on_expiry_passed(&self, line: usize, date: &QuoteDate) {
        tracing::info!(line, %date, "quote after expiry, stopping");
    }

    fn on_source_unavailable(&self, path: &Path, error: &FeedError) {
        tracing::error!(path = %path.display(), %error, "cannot open quote source");
    }

    fn on_finish(&self, report: &BacktestReport) {
        tracing::info!(
            model = %report.model,
            records = report.records,
            skipped = report.skipped.len(),
            defaulted = report.defaulted,
            final_error = ?report.errors.final_error,
            "backtest finished"
        );
    }
}
