//! Hedge position and the per-quote output record.

use pricer_core::types::{PricingResult, QuoteDate};
use serde::Serialize;

/// Column names of the result file, in record field order.
pub const RESULT_HEADER: [&str; 9] = [
    "Date",
    "Spot",
    "T",
    "OptionPrice",
    "Delta",
    "StockPos",
    "Cash",
    "PortfolioValue",
    "HedgingError",
];

/// Cash and stock held by one self-financing hedge.
///
/// # Examples
///
/// ```
/// use pricer_risk::backtest::HedgePosition;
///
/// // Sell the option for 10, buy 0.6 shares at 100
/// let mut position = HedgePosition::open(10.0);
/// let trade = position.rebalance(0.6, 100.0);
///
/// assert_eq!(trade, 0.6);
/// assert_eq!(position.cash(), 10.0 - 60.0);
/// assert_eq!(position.value(100.0), position.cash() + 0.6 * 100.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HedgePosition {
    cash: f64,
    shares_held: f64,
}

impl HedgePosition {
    /// A fresh position funded by the option premium, holding no stock.
    #[inline]
    pub fn open(premium: f64) -> Self {
        Self {
            cash: premium,
            shares_held: 0.0,
        }
    }

    /// Cash balance.
    #[inline]
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Shares of the underlying held.
    #[inline]
    pub fn shares_held(&self) -> f64 {
        self.shares_held
    }

    /// Moves the stock holding to `target` shares, paying for the trade out
    /// of cash at `spot`. Returns the number of shares traded.
    pub fn rebalance(&mut self, target: f64, spot: f64) -> f64 {
        let trade = target - self.shares_held;
        self.cash -= trade * spot;
        self.shares_held = target;
        trade
    }

    /// Mark-to-market value at `spot`.
    #[inline]
    pub fn value(&self, spot: f64) -> f64 {
        self.cash + self.shares_held * spot
    }
}

/// One row of backtest output.
///
/// Portfolio value and hedging error are derived in [`BacktestRecord::new`]
/// and cannot be set independently:
///
/// - `portfolio_value = cash + shares_held · spot`
/// - `hedging_error = portfolio_value - fair_value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestRecord {
    #[serde(rename = "Date")]
    date: QuoteDate,
    #[serde(rename = "Spot")]
    spot: f64,
    #[serde(rename = "T")]
    time_to_expiry: f64,
    #[serde(rename = "OptionPrice")]
    fair_value: f64,
    #[serde(rename = "Delta")]
    delta: f64,
    #[serde(rename = "StockPos")]
    shares_held: f64,
    #[serde(rename = "Cash")]
    cash: f64,
    #[serde(rename = "PortfolioValue")]
    portfolio_value: f64,
    #[serde(rename = "HedgingError")]
    hedging_error: f64,
}

impl BacktestRecord {
    /// Builds a record from a priced quote and the position after rebalancing.
    pub fn new(
        date: QuoteDate,
        spot: f64,
        time_to_expiry: f64,
        result: PricingResult,
        position: &HedgePosition,
    ) -> Self {
        let portfolio_value = position.value(spot);
        Self {
            date,
            spot,
            time_to_expiry,
            fair_value: result.fair_value,
            delta: result.delta,
            shares_held: position.shares_held(),
            cash: position.cash(),
            portfolio_value,
            hedging_error: portfolio_value - result.fair_value,
        }
    }

    /// Quote date, as read.
    pub fn date(&self) -> &QuoteDate {
        &self.date
    }

    /// Spot price.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Time to expiry in years.
    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// Model price of the option.
    pub fn fair_value(&self) -> f64 {
        self.fair_value
    }

    /// Model delta.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Shares held after rebalancing.
    pub fn shares_held(&self) -> f64 {
        self.shares_held
    }

    /// Cash after rebalancing.
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// `cash + shares_held · spot`.
    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    /// `portfolio_value - fair_value`.
    pub fn hedging_error(&self) -> f64 {
        self.hedging_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::types::Date;

    #[test]
    fn test_rebalance_is_self_financing() {
        let mut position = HedgePosition::open(5.0);
        position.rebalance(0.5, 100.0);
        let before = position.value(102.0);
        let trade = position.rebalance(0.55, 102.0);
        assert!((trade - 0.05).abs() < 1e-15);
        // Trading at the mark leaves the value unchanged
        assert!((position.value(102.0) - before).abs() < 1e-12);
    }

    #[test]
    fn test_record_derives_value_and_error() {
        let mut position = HedgePosition::open(4.0);
        position.rebalance(0.5, 100.0);
        let result = PricingResult {
            fair_value: 4.5,
            delta: 0.5,
        };
        let record = BacktestRecord::new(
            Date::from_ymd(2024, 6, 3).unwrap().into(),
            101.0,
            0.5,
            result,
            &position,
        );
        assert_eq!(record.cash(), 4.0 - 50.0);
        assert_eq!(record.portfolio_value(), -46.0 + 0.5 * 101.0);
        assert_eq!(record.hedging_error(), record.portfolio_value() - 4.5);
        assert_eq!(record.date().to_string(), "2024-06-03");
    }

    #[test]
    fn test_header_matches_field_count() {
        assert_eq!(RESULT_HEADER.len(), 9);
        assert_eq!(RESULT_HEADER[2], "T");
    }
}
