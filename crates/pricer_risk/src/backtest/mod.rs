//! Self-financing delta-hedge backtesting.
//!
//! - `backtester`: [`Backtester`], [`HedgeSession`] and the run outcome types
//! - `record`: [`HedgePosition`] and the per-quote [`BacktestRecord`]
//! - `sink`: the [`RecordSink`] trait and result-file helpers
//! - `observer`: progress hooks, [`TracingObserver`] and [`NullObserver`]
//! - `error`: [`BacktestError`]

mod backtester;
mod error;
mod observer;
mod record;
mod sink;

pub use backtester::{
    BacktestReport, BacktestState, Backtester, HedgeSession, RowOutcome, SkipReason, SkippedRow,
    Termination,
};
pub use error::BacktestError;
pub use observer::{BacktestObserver, NullObserver, TracingObserver};
pub use record::{BacktestRecord, HedgePosition, RESULT_HEADER};
pub use sink::{create_result_file, result_writer, RecordSink};
