//! Synthetic quote generator.
//!
//! Produces reproducible daily quote series for trying the backtester
//! without market data:
//!
//! - **Walk**: `spot_{k+1} = spot_k · (1 + ε)`, `ε ~ N(0, σ/√252)`, the
//!   arithmetic daily-return walk
//! - **Uniform**: each day's spot drawn independently from `[low, high)`,
//!   mimicking a flat terminal export
//!
//! Rate and volatility are constant over the series and are written in the
//! units of the chosen [`FeedLayout`].

use std::fs;
use std::io::Write;
use std::path::Path;

use pricer_core::types::{Date, MarketQuote};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{FeedError, SinkError};
use crate::layout::FeedLayout;
use crate::sink::CsvRecordSink;

/// Trading days per year used to scale daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default generator seed.
pub const DEFAULT_FEED_SEED: u64 = 42;

/// How the spot column evolves from one day to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpotProcess {
    /// Multiplicative daily-return walk from an initial spot.
    Walk {
        /// First spot in the series
        initial: f64,
    },
    /// Independent uniform draws.
    Uniform {
        /// Inclusive lower bound
        low: f64,
        /// Exclusive upper bound
        high: f64,
    },
}

/// Generator settings for one synthetic quote file.
///
/// # Examples
///
/// ```rust
/// use adapter_feeds::SyntheticFeed;
/// use pricer_core::types::Date;
///
/// let start = Date::from_ymd(2023, 1, 1).unwrap();
/// let feed = SyntheticFeed::walk(start, 100.0, 0.2).with_days(5);
/// let quotes = feed.quotes().unwrap();
/// assert_eq!(quotes.len(), 5);
/// assert_eq!(quotes[0].spot, 100.0);
///
/// // Same seed, same series
/// assert_eq!(quotes, feed.quotes().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticFeed {
    layout: FeedLayout,
    process: SpotProcess,
    start: Date,
    days: usize,
    rate: f64,
    volatility: f64,
    seed: u64,
    weekdays_only: bool,
}

impl SyntheticFeed {
    /// Daily-return walk in the standard layout: 252 days from `start` at a
    /// 4.5% rate. `volatility` is a decimal fraction.
    pub fn walk(start: Date, initial_spot: f64, volatility: f64) -> Self {
        Self {
            layout: FeedLayout::Standard,
            process: SpotProcess::Walk {
                initial: initial_spot,
            },
            start,
            days: 252,
            rate: 0.045,
            volatility,
            seed: DEFAULT_FEED_SEED,
            weekdays_only: false,
        }
    }

    /// Terminal-style export in the percentage layout: 100 days from
    /// `start`, spot uniform in [150, 160), rate 5%, volatility 20%.
    pub fn terminal_export(start: Date) -> Self {
        Self {
            layout: FeedLayout::Percentage,
            process: SpotProcess::Uniform {
                low: 150.0,
                high: 160.0,
            },
            start,
            days: 100,
            rate: 5.0,
            volatility: 20.0,
            seed: DEFAULT_FEED_SEED,
            weekdays_only: false,
        }
    }

    /// Replaces the spot process.
    pub fn with_process(mut self, process: SpotProcess) -> Self {
        self.process = process;
        self
    }

    /// Sets the first date.
    pub fn with_start(mut self, start: Date) -> Self {
        self.start = start;
        self
    }

    /// Sets the number of rows.
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Sets the constant rate, in layout units.
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the constant volatility, in layout units.
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Sets the generator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Skips Saturdays and Sundays when laying out dates.
    pub fn weekdays_only(mut self, weekdays_only: bool) -> Self {
        self.weekdays_only = weekdays_only;
        self
    }

    /// Layout the file is written in.
    #[inline]
    pub fn layout(&self) -> FeedLayout {
        self.layout
    }

    /// The series as the backtester would read it back: rate and
    /// volatility converted to decimal fractions.
    ///
    /// # Errors
    /// `FeedError::InvalidParameter` for a non-finite or negative
    /// volatility, or an empty uniform range.
    pub fn quotes(&self) -> Result<Vec<MarketQuote>, FeedError> {
        let divisor = self.layout.divisor();
        Ok(self
            .raw_rows()?
            .into_iter()
            .map(|(date, spot)| {
                MarketQuote::new(date, spot, self.rate / divisor, self.volatility / divisor)
            })
            .collect())
    }

    /// Writes the series, header included, to `writer`.
    ///
    /// # Errors
    /// `FeedError::InvalidParameter` as for [`SyntheticFeed::quotes`],
    /// `FeedError::Write` if writing fails.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<W, FeedError> {
        let rows = self.raw_rows()?;
        let mut sink = CsvRecordSink::from_writer(writer, &self.layout.header())?;
        for (date, spot) in rows {
            sink.write_row(&(date.to_string(), spot, self.rate, self.volatility))?;
        }
        Ok(sink.into_inner()?)
    }

    /// Writes the series to `path`, creating parent directories.
    ///
    /// # Errors
    /// As for [`SyntheticFeed::write_to`], plus `FeedError::Write` if the
    /// file or its directory cannot be created.
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<(), FeedError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SinkError::from)?;
        }
        let file = fs::File::create(path).map_err(SinkError::from)?;
        self.write_to(file)?;
        tracing::info!(
            path = %path.display(),
            rows = self.days,
            layout = %self.layout,
            seed = self.seed,
            "synthetic feed written"
        );
        Ok(())
    }

    fn dates(&self) -> Vec<Date> {
        let mut dates = Vec::with_capacity(self.days);
        let mut date = self.start;
        while dates.len() < self.days {
            if !(self.weekdays_only && date.is_weekend()) {
                dates.push(date);
            }
            date = date.add_days(1);
        }
        dates
    }

    /// Dates and spots in layout units.
    fn raw_rows(&self) -> Result<Vec<(Date, f64)>, FeedError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let dates = self.dates();
        let spots: Vec<f64> = match self.process {
            SpotProcess::Walk { initial } => {
                let daily_vol = self.volatility / self.layout.divisor() / TRADING_DAYS_PER_YEAR.sqrt();
                let normal = Normal::new(0.0, daily_vol).map_err(|e| FeedError::InvalidParameter {
                    name: "volatility",
                    reason: e.to_string(),
                })?;
                let mut spot = initial;
                (0..dates.len())
                    .map(|k| {
                        if k > 0 {
                            spot *= 1.0 + normal.sample(&mut rng);
                        }
                        spot
                    })
                    .collect()
            }
            SpotProcess::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && low < high) {
                    return Err(FeedError::InvalidParameter {
                        name: "spot range",
                        reason: format!("[{}, {}) is empty", low, high),
                    });
                }
                (0..dates.len()).map(|_| rng.gen_range(low..high)).collect()
            }
        };
        Ok(dates.into_iter().zip(spots).collect())
    }
}
