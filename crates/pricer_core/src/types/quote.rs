//! One row of market data.

use super::time::QuoteDate;

/// A dated market observation: spot, risk-free rate and volatility.
///
/// Rate and volatility are decimal fractions. Quotes are consumed in the
/// order they arrive; nothing here sorts or de-duplicates them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketQuote {
    /// Quote date as it appeared in the source
    pub date: QuoteDate,
    /// Spot price of the underlying
    pub spot: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Annualised volatility
    pub volatility: f64,
}

impl MarketQuote {
    /// Bundles one observation.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::{Date, MarketQuote};
    ///
    /// let date = Date::from_ymd(2024, 6, 1).unwrap();
    /// let quote = MarketQuote::new(date, 100.0, 0.05, 0.2);
    /// assert_eq!(quote.date.as_date(), Some(date));
    /// ```
    pub fn new(date: impl Into<QuoteDate>, spot: f64, rate: f64, volatility: f64) -> Self {
        Self {
            date: date.into(),
            spot,
            rate,
            volatility,
        }
    }
}
