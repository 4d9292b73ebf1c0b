//! Hedging-error statistics.
//!
//! [`HedgingErrorStats`] accumulates errors one at a time (Welford's
//! update, so long runs lose no precision to a running sum of squares);
//! [`HedgingErrorSummary`] is the finished result.

use crate::backtest::BacktestRecord;

/// Summary of a hedging-error series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HedgingErrorSummary {
    /// Number of observations
    pub count: usize,
    /// Mean error; zero for an empty series
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for fewer than two observations
    pub std_dev: f64,
    /// Largest absolute error
    pub max_abs: f64,
    /// Last error in the series
    pub final_error: Option<f64>,
}

impl HedgingErrorSummary {
    /// Summarises the errors of `records`.
    pub fn from_records(records: &[BacktestRecord]) -> Self {
        Self::collect(records.iter().map(BacktestRecord::hedging_error))
    }

    /// Summarises a plain error series.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_risk::metrics::HedgingErrorSummary;
    ///
    /// let summary = HedgingErrorSummary::from_errors(&[1.0, -3.0, 2.0]);
    /// assert_eq!(summary.count, 3);
    /// assert_eq!(summary.mean, 0.0);
    /// assert_eq!(summary.max_abs, 3.0);
    /// assert_eq!(summary.final_error, Some(2.0));
    /// ```
    pub fn from_errors(errors: &[f64]) -> Self {
        Self::collect(errors.iter().copied())
    }

    fn collect(errors: impl IntoIterator<Item = f64>) -> Self {
        let mut stats = HedgingErrorStats::default();
        for error in errors {
            stats.push(error);
        }
        stats.summary()
    }
}

/// Running hedging-error statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HedgingErrorStats {
    count: usize,
    mean: f64,
    m2: f64,
    max_abs: f64,
    last: Option<f64>,
}

impl HedgingErrorStats {
    /// Adds one observation.
    pub fn push(&mut self, error: f64) {
        self.count += 1;
        let delta = error - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (error - self.mean);
        self.max_abs = self.max_abs.max(error.abs());
        self.last = Some(error);
    }

    /// Statistics so far.
    pub fn summary(&self) -> HedgingErrorSummary {
        let std_dev = if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        };
        HedgingErrorSummary {
            count: self.count,
            mean: self.mean,
            std_dev,
            max_abs: self.max_abs,
            final_error: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_empty_series() {
        let summary = HedgingErrorSummary::from_errors(&[]);
        assert_eq!(summary, HedgingErrorSummary::default());
    }

    #[test]
    fn test_single_observation_has_zero_std() {
        let summary = HedgingErrorSummary::from_errors(&[-1.5]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, -1.5);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.max_abs, 1.5);
    }

    #[test]
    fn test_sample_std_matches_textbook() {
        // mean 5, squared deviations sum to 32, n - 1 = 7
        let summary = HedgingErrorSummary::from_errors(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(summary.mean, 5.0, epsilon = 1e-12);
        assert_relative_eq!(summary.std_dev, (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_eq!(summary.max_abs, 9.0);
    }

    proptest! {
        #[test]
        fn prop_matches_two_pass(errors in proptest::collection::vec(-50.0f64..50.0, 2..200)) {
            let n = errors.len() as f64;
            let mean = errors.iter().sum::<f64>() / n;
            let var = errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / (n - 1.0);

            let summary = HedgingErrorSummary::from_errors(&errors);
            prop_assert!((summary.mean - mean).abs() < 1e-9);
            prop_assert!((summary.std_dev - var.sqrt()).abs() < 1e-9);
            prop_assert_eq!(summary.final_error, errors.last().copied());
        }
    }
}
