//! # Pricer Risk (L4: Application)
//!
//! Delta-hedge backtesting on top of the pricing models.
//!
//! This crate provides:
//! - A backtester that replays dated quotes through any
//!   [`OptionPricer`](pricer_core::traits::OptionPricer), running a
//!   self-financing delta hedge of one option
//! - Per-quote records and result-file sinks
//! - Hedging-error statistics
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  backtest/  - Backtester, HedgeSession, │
//! │               records, sinks, observers │
//! │  metrics    - hedging-error summary     │
//! └─────────────────────────────────────────┘
//!          ↓                       ↓
//! ┌──────────────────────┐ ┌──────────────────┐
//! │ pricer_models (L2)   │ │ adapter_feeds    │
//! │ OptionContract, BS,  │ │ quote feed,      │
//! │ binomial             │ │ CSV sink         │
//! └──────────────────────┘ └──────────────────┘
//! ```
//!
//! The Monte Carlo model lives in `pricer_pricing` and plugs in through the
//! same trait.
//!
//! ## Example
//!
//! ```
//! use adapter_feeds::{FeedLayout, QuoteFeed};
//! use pricer_core::types::Date;
//! use pricer_models::analytical::BlackScholes;
//! use pricer_models::instruments::OptionContract;
//! use pricer_risk::backtest::{Backtester, NullObserver, Termination};
//!
//! let csv = "Date,Spot,Rate,Vol\n\
//!            2024-06-03,100,0.05,0.2\n\
//!            2024-06-04,oops,0.05,0.2\n\
//!            2024-06-05,101,0.05,0.2\n\
//!            2025-01-02,101,0.05,0.2\n";
//! let feed = QuoteFeed::from_reader(csv.as_bytes(), FeedLayout::Standard);
//!
//! let expiry = Date::from_ymd(2024, 12, 30).unwrap();
//! let contract = OptionContract::new(100.0, expiry, true).unwrap();
//! let mut records = Vec::new();
//! let report = Backtester::new(BlackScholes, contract)
//!     .run(feed, &mut records, &NullObserver)
//!     .unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(report.skipped[0].line, 3);
//! assert!(matches!(report.termination, Termination::ExpiryPassed { line: 5, .. }));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod backtest;
pub mod metrics;

pub use backtest::{BacktestError, BacktestReport, Backtester};
pub use metrics::HedgingErrorSummary;
