//! The hedge simulation loop.
//!
//! A run walks the quotes in the order given. For each usable quote it
//! prices the option, rebalances the hedge to the model delta and emits a
//! record:
//!
//! 1. The first usable quote opens the position with the option premium
//!    as cash and no stock.
//! 2. Every usable quote trades `delta - shares_held` shares at spot,
//!    paid for out of cash.
//! 3. A quote dated after expiry ends the run; it and anything after it
//!    produce no record.
//!
//! Rows that cannot be used are skipped and listed in the
//! [`BacktestReport`] with their line number; they leave the hedge
//! untouched. Cash earns no interest between quotes.

use std::fmt;
use std::path::Path;

use adapter_feeds::{FeedLayout, QuoteFeed, RowError};
use pricer_core::traits::OptionPricer;
use pricer_core::types::{
    time_to_expiry, DateError, DayCountConvention, MarketQuote, PricingError, QuoteDate,
    UnparseableDatePolicy,
};
use pricer_models::instruments::OptionContract;

use super::error::BacktestError;
use super::observer::BacktestObserver;
use super::record::{BacktestRecord, HedgePosition};
use super::sink::RecordSink;
use crate::metrics::{HedgingErrorStats, HedgingErrorSummary};

/// Lifecycle of a [`HedgeSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktestState {
    /// No quote has been hedged yet.
    AwaitingFirstQuote,
    /// The position is open.
    Hedging,
    /// A quote after expiry was seen.
    Done,
    /// A record could not be delivered.
    Failed,
}

/// Why a row produced no record.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The row could not be read as a quote.
    MalformedRow(RowError),
    /// The quote date did not parse and the policy is to skip.
    DateRejected(DateError),
    /// The pricer rejected the quote's values.
    Pricing(PricingError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedRow(e) => write!(f, "malformed row: {}", e),
            SkipReason::DateRejected(e) => write!(f, "date rejected: {}", e),
            SkipReason::Pricing(e) => write!(f, "pricing failed: {}", e),
        }
    }
}

/// What happened to one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The hedge was rebalanced and this record produced.
    Recorded(BacktestRecord),
    /// The row was ignored.
    Skipped(SkipReason),
    /// The quote is after expiry; the session is now done.
    ExpiryPassed,
}

/// A row that produced no record.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source
    pub line: usize,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Termination {
    /// Every row was consumed.
    SourceExhausted,
    /// A quote dated after expiry stopped the run.
    ExpiryPassed {
        /// Line of the stopping quote
        line: usize,
        /// Its date
        date: QuoteDate,
    },
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    /// Display name of the pricing model
    pub model: String,
    /// Records emitted
    pub records: usize,
    /// Rows that produced no record, in source order
    pub skipped: Vec<SkippedRow>,
    /// Records whose time to expiry was defaulted to zero
    pub defaulted: usize,
    /// How the run ended
    pub termination: Termination,
    /// Position after the last record
    pub final_position: Option<HedgePosition>,
    /// Hedging-error statistics over the emitted records
    pub errors: HedgingErrorSummary,
}

/// Replays quotes through one pricing model, hedging one option.
///
/// The backtester itself is immutable and can start any number of runs;
/// each run's state lives in a [`HedgeSession`].
///
/// # Examples
///
/// ```
/// use pricer_core::types::{Date, MarketQuote};
/// use pricer_models::analytical::BlackScholes;
/// use pricer_models::instruments::OptionContract;
/// use pricer_risk::backtest::{Backtester, NullObserver};
///
/// let expiry = Date::from_ymd(2024, 12, 30).unwrap();
/// let contract = OptionContract::new(100.0, expiry, true).unwrap();
/// let backtester = Backtester::new(BlackScholes, contract);
///
/// let quotes = vec![
///     MarketQuote::new(Date::from_ymd(2024, 6, 3).unwrap(), 100.0, 0.05, 0.2),
///     MarketQuote::new(Date::from_ymd(2024, 6, 4).unwrap(), 101.0, 0.05, 0.2),
/// ];
/// let mut records = Vec::new();
/// let report = backtester
///     .run_quotes(quotes, &mut records, &NullObserver)
///     .unwrap();
///
/// assert_eq!(report.records, 2);
/// assert_eq!(records[1].shares_held(), records[1].delta());
/// ```
#[derive(Debug, Clone)]
pub struct Backtester<P> {
    pricer: P,
    contract: OptionContract,
    convention: DayCountConvention,
    date_policy: UnparseableDatePolicy,
}

impl<P: OptionPricer> Backtester<P> {
    /// Hedges `contract` with `pricer`, using ACT/365.25 and defaulting
    /// unparseable dates to zero time to expiry.
    pub fn new(pricer: P, contract: OptionContract) -> Self {
        Self {
            pricer,
            contract,
            convention: DayCountConvention::default(),
            date_policy: UnparseableDatePolicy::default(),
        }
    }

    /// Sets the day count convention for time to expiry.
    pub fn with_convention(mut self, convention: DayCountConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the policy for quote dates that do not parse.
    pub fn with_date_policy(mut self, policy: UnparseableDatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    /// The pricing model.
    #[inline]
    pub fn pricer(&self) -> &P {
        &self.pricer
    }

    /// The hedged option.
    #[inline]
    pub fn contract(&self) -> &OptionContract {
        &self.contract
    }

    /// Starts a fresh run.
    pub fn session(&self) -> HedgeSession<'_, P> {
        HedgeSession {
            backtester: self,
            state: BacktestState::AwaitingFirstQuote,
            position: HedgePosition::default(),
            records: 0,
            skipped: Vec::new(),
            defaulted: 0,
            termination: Termination::SourceExhausted,
            stats: HedgingErrorStats::default(),
        }
    }

    /// Runs over numbered rows, writing each record to `sink`.
    ///
    /// # Errors
    /// `BacktestError::Sink` if the sink fails; the run stops there.
    pub fn run<I, S, O>(
        &self,
        rows: I,
        sink: &mut S,
        observer: &O,
    ) -> Result<BacktestReport, BacktestError>
    where
        I: IntoIterator<Item = (usize, Result<MarketQuote, RowError>)>,
        S: RecordSink + ?Sized,
        O: BacktestObserver + ?Sized,
    {
        observer.on_start(self.pricer.name(), &self.contract);
        let mut session = self.session();
        session.drive(rows, sink, observer)?;
        let report = session.into_report();
        observer.on_finish(&report);
        Ok(report)
    }

    /// Runs over quotes already in memory, numbering them from 1.
    ///
    /// # Errors
    /// As for [`Backtester::run`].
    pub fn run_quotes<I, S, O>(
        &self,
        quotes: I,
        sink: &mut S,
        observer: &O,
    ) -> Result<BacktestReport, BacktestError>
    where
        I: IntoIterator<Item = MarketQuote>,
        S: RecordSink + ?Sized,
        O: BacktestObserver + ?Sized,
    {
        let rows = quotes
            .into_iter()
            .enumerate()
            .map(|(index, quote)| (index + 1, Ok(quote)));
        self.run(rows, sink, observer)
    }

    /// Opens a quote file and runs over it.
    ///
    /// # Errors
    /// `BacktestError::SourceUnavailable` if the file cannot be opened, in
    /// which case nothing is written to `sink`. Otherwise as for
    /// [`Backtester::run`].
    pub fn run_path<S, O>(
        &self,
        path: impl AsRef<Path>,
        layout: FeedLayout,
        sink: &mut S,
        observer: &O,
    ) -> Result<BacktestReport, BacktestError>
    where
        S: RecordSink + ?Sized,
        O: BacktestObserver + ?Sized,
    {
        let path = path.as_ref();
        let feed = match QuoteFeed::open(path, layout) {
            Ok(feed) => feed,
            Err(source) => {
                observer.on_source_unavailable(path, &source);
                return Err(BacktestError::SourceUnavailable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.run(feed, sink, observer)
    }
}

/// State of one backtest run.
///
/// Drive it row by row with [`HedgeSession::process`] and
/// [`HedgeSession::reject`], feed it a batch with [`HedgeSession::drive`],
/// or let [`Backtester::run`] do both.
#[derive(Debug)]
pub struct HedgeSession<'a, P> {
    backtester: &'a Backtester<P>,
    state: BacktestState,
    position: HedgePosition,
    records: usize,
    skipped: Vec<SkippedRow>,
    defaulted: usize,
    termination: Termination,
    stats: HedgingErrorStats,
}

impl<P: OptionPricer> HedgeSession<'_, P> {
    /// Current state.
    #[inline]
    pub fn state(&self) -> BacktestState {
        self.state
    }

    /// Current position; all zero before the first record.
    #[inline]
    pub fn position(&self) -> HedgePosition {
        self.position
    }

    /// Hedges one quote.
    ///
    /// # Errors
    /// `BacktestError::SessionFinished` once the session is done or failed.
    pub fn process(&mut self, line: usize, quote: &MarketQuote) -> Result<RowOutcome, BacktestError> {
        if matches!(self.state, BacktestState::Done | BacktestState::Failed) {
            return Err(BacktestError::SessionFinished);
        }
        let backtester = self.backtester;
        let contract = &backtester.contract;

        let t = match time_to_expiry(
            &quote.date,
            contract.expiry(),
            backtester.convention,
            backtester.date_policy,
        ) {
            Ok(t) => t,
            Err(err) => return Ok(self.skip(line, SkipReason::DateRejected(err))),
        };
        if t.is_past_expiry() {
            self.state = BacktestState::Done;
            self.termination = Termination::ExpiryPassed {
                line,
                date: quote.date.clone(),
            };
            return Ok(RowOutcome::ExpiryPassed);
        }

        let inputs = contract.inputs(quote.spot, quote.rate, quote.volatility, t.years());
        let result = match backtester.pricer.evaluate(&inputs) {
            Ok(result) => result,
            Err(err) => return Ok(self.skip(line, SkipReason::Pricing(err))),
        };

        if self.state == BacktestState::AwaitingFirstQuote {
            self.position = HedgePosition::open(result.fair_value);
            self.state = BacktestState::Hedging;
        }
        self.position.rebalance(result.delta, quote.spot);

        let record = BacktestRecord::new(
            quote.date.clone(),
            quote.spot,
            t.years(),
            result,
            &self.position,
        );
        self.records += 1;
        if t.is_defaulted() {
            self.defaulted += 1;
        }
        self.stats.push(record.hedging_error());
        Ok(RowOutcome::Recorded(record))
    }

    /// Feeds rows into an existing session until the rows run out or a
    /// quote after expiry is seen. A sink failure leaves the session
    /// [`BacktestState::Failed`].
    ///
    /// # Errors
    /// `BacktestError::Sink` if the sink fails,
    /// `BacktestError::SessionFinished` if the session had already stopped.
    pub fn drive<I, S, O>(
        &mut self,
        rows: I,
        sink: &mut S,
        observer: &O,
    ) -> Result<(), BacktestError>
    where
        I: IntoIterator<Item = (usize, Result<MarketQuote, RowError>)>,
        S: RecordSink + ?Sized,
        O: BacktestObserver + ?Sized,
    {
        for (line, row) in rows {
            let outcome = match row {
                Ok(quote) => self.process(line, &quote)?,
                Err(err) => self.reject(line, err),
            };
            match outcome {
                RowOutcome::Recorded(record) => {
                    if let Err(err) = sink.record(&record) {
                        self.state = BacktestState::Failed;
                        return Err(err.into());
                    }
                    observer.on_record(line, &record);
                }
                RowOutcome::Skipped(reason) => observer.on_skip(line, &reason),
                RowOutcome::ExpiryPassed => {
                    if let Termination::ExpiryPassed { date, .. } = &self.termination {
                        observer.on_expiry_passed(line, date);
                    }
                    break;
                }
            }
        }
        if let Err(err) = sink.finish() {
            self.state = BacktestState::Failed;
            return Err(err.into());
        }
        Ok(())
    }

    /// Records a row that could not be read as a quote.
    pub fn reject(&mut self, line: usize, error: RowError) -> RowOutcome {
        self.skip(line, SkipReason::MalformedRow(error))
    }

    fn skip(&mut self, line: usize, reason: SkipReason) -> RowOutcome {
        self.skipped.push(SkippedRow {
            line,
            reason: reason.clone(),
        });
        RowOutcome::Skipped(reason)
    }

    /// Closes the session and summarises it.
    pub fn into_report(self) -> BacktestReport {
        BacktestReport {
            model: self.backtester.pricer.name().to_string(),
            records: self.records,
            skipped: self.skipped,
            defaulted: self.defaulted,
            termination: self.termination,
            final_position: (self.state != BacktestState::AwaitingFirstQuote)
                .then_some(self.position),
            errors: self.stats.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::NullObserver;
    use approx::assert_relative_eq;
    use pricer_core::types::Date;
    use pricer_models::analytical::BlackScholes;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn backtester() -> Backtester<BlackScholes> {
        let contract = OptionContract::new(100.0, ymd(2024, 12, 30), true).unwrap();
        Backtester::new(BlackScholes, contract)
    }

    #[test]
    fn test_first_quote_opens_with_premium() {
        let bt = backtester();
        let mut session = bt.session();
        assert_eq!(session.state(), BacktestState::AwaitingFirstQuote);

        let quote = MarketQuote::new(ymd(2024, 6, 1), 100.0, 0.05, 0.2);
        let RowOutcome::Recorded(record) = session.process(2, &quote).unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(session.state(), BacktestState::Hedging);
        assert_eq!(record.shares_held(), record.delta());
        assert_eq!(record.cash(), record.fair_value() - record.delta() * 100.0);
        assert_relative_eq!(record.hedging_error(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_second_quote_trades_difference() {
        let bt = backtester();
        let mut session = bt.session();
        session
            .process(2, &MarketQuote::new(ymd(2024, 6, 3), 100.0, 0.05, 0.2))
            .unwrap();
        let before = session.position();

        let RowOutcome::Recorded(record) = session
            .process(3, &MarketQuote::new(ymd(2024, 6, 4), 102.0, 0.05, 0.2))
            .unwrap()
        else {
            panic!("expected a record");
        };
        let trade = record.delta() - before.shares_held();
        assert_eq!(record.cash(), before.cash() - trade * 102.0);
        assert_eq!(
            record.portfolio_value(),
            record.cash() + record.shares_held() * 102.0
        );
    }

    #[test]
    fn test_expiry_passed_finishes_session() {
        let bt = backtester();
        let mut session = bt.session();
        let late = MarketQuote::new(ymd(2024, 12, 31), 100.0, 0.05, 0.2);
        assert_eq!(session.process(7, &late).unwrap(), RowOutcome::ExpiryPassed);
        assert_eq!(session.state(), BacktestState::Done);
        assert!(matches!(
            session.process(8, &late),
            Err(BacktestError::SessionFinished)
        ));

        let report = session.into_report();
        assert_eq!(report.records, 0);
        assert_eq!(report.final_position, None);
        assert_eq!(
            report.termination,
            Termination::ExpiryPassed {
                line: 7,
                date: ymd(2024, 12, 31).into()
            }
        );
    }

    #[test]
    fn test_quote_on_expiry_day_is_hedged_at_intrinsic() {
        let bt = backtester();
        let mut session = bt.session();
        let outcome = session
            .process(2, &MarketQuote::new(ymd(2024, 12, 30), 103.0, 0.05, 0.2))
            .unwrap();
        let RowOutcome::Recorded(record) = outcome else {
            panic!("expected a record");
        };
        assert_eq!(record.time_to_expiry(), 0.0);
        assert_eq!(record.fair_value(), 3.0);
        assert_eq!(record.delta(), 0.0);
    }

    #[test]
    fn test_invalid_date_policies() {
        let quote = MarketQuote::new(QuoteDate::parse("not-a-date"), 104.0, 0.05, 0.2);

        let defaulting = backtester();
        let mut session = defaulting.session();
        let RowOutcome::Recorded(record) = session.process(2, &quote).unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(record.time_to_expiry(), 0.0);
        assert_eq!(record.fair_value(), 4.0);
        assert_eq!(session.into_report().defaulted, 1);

        let skipping = backtester().with_date_policy(UnparseableDatePolicy::SkipRow);
        let mut session = skipping.session();
        let outcome = session.process(2, &quote).unwrap();
        assert!(matches!(
            outcome,
            RowOutcome::Skipped(SkipReason::DateRejected(_))
        ));
        assert_eq!(session.state(), BacktestState::AwaitingFirstQuote);
    }

    #[test]
    fn test_pricing_error_skips_without_touching_position() {
        let bt = backtester();
        let mut session = bt.session();
        let outcome = session
            .process(2, &MarketQuote::new(ymd(2024, 6, 3), -5.0, 0.05, 0.2))
            .unwrap();
        assert!(matches!(
            outcome,
            RowOutcome::Skipped(SkipReason::Pricing(PricingError::InvalidInput(_)))
        ));
        assert_eq!(session.state(), BacktestState::AwaitingFirstQuote);
        assert_eq!(session.position(), HedgePosition::default());
    }

    #[test]
    fn test_run_lists_skipped_lines() {
        let rows = vec![
            (2, Ok(MarketQuote::new(ymd(2024, 6, 3), 100.0, 0.05, 0.2))),
            (
                3,
                Err(RowError::InvalidNumber {
                    column: "spot",
                    value: "n/a".to_string(),
                }),
            ),
            (4, Ok(MarketQuote::new(ymd(2024, 6, 5), 99.0, 0.05, 0.2))),
        ];
        let mut records = Vec::new();
        let report = backtester().run(rows, &mut records, &NullObserver).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(report.termination, Termination::SourceExhausted);
        assert_eq!(report.model, "Black-Scholes");
        assert_eq!(report.errors.count, 2);
    }

    struct FullDisk;

    impl RecordSink for FullDisk {
        fn record(&mut self, _record: &BacktestRecord) -> Result<(), adapter_feeds::SinkError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    #[test]
    fn test_sink_failure_fails_session() {
        let bt = backtester();
        let mut session = bt.session();
        let rows = vec![(2, Ok(MarketQuote::new(ymd(2024, 6, 3), 100.0, 0.05, 0.2)))];
        let result = session.drive(rows, &mut FullDisk, &NullObserver);
        assert!(matches!(result, Err(BacktestError::Sink(_))));
        assert_eq!(session.state(), BacktestState::Failed);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::MalformedRow(RowError::MissingField { column: "rate" });
        assert_eq!(reason.to_string(), "malformed row: Missing rate column");
    }
}
