//! The single vanilla option a backtest hedges.

use pricer_core::types::{Date, PricingInputs};

use super::error::InstrumentError;

/// European vanilla option terms.
///
/// Immutable once built. Market state (spot, rate, volatility) and the
/// remaining life are supplied per quote through [`OptionContract::inputs`].
///
/// # Examples
/// ```
/// use pricer_core::types::Date;
/// use pricer_models::instruments::OptionContract;
///
/// let expiry = Date::from_ymd(2024, 12, 30).unwrap();
/// let call = OptionContract::new(100.0, expiry, true).unwrap();
/// assert_eq!(call.strike(), 100.0);
///
/// assert!(OptionContract::new(0.0, expiry, true).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    strike: f64,
    expiry: Date,
    is_call: bool,
}

impl OptionContract {
    /// Creates a contract.
    ///
    /// # Errors
    /// `InstrumentError::InvalidStrike` if the strike is not a positive finite number.
    pub fn new(strike: f64, expiry: Date, is_call: bool) -> Result<Self, InstrumentError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        Ok(Self {
            strike,
            expiry,
            is_call,
        })
    }

    /// Strike price (K).
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Expiry date.
    #[inline]
    pub fn expiry(&self) -> Date {
        self.expiry
    }

    /// True for a call, false for a put.
    #[inline]
    pub fn is_call(&self) -> bool {
        self.is_call
    }

    /// "Call" or "Put".
    pub fn kind(&self) -> &'static str {
        if self.is_call {
            "Call"
        } else {
            "Put"
        }
    }

    /// Pricing arguments for this contract under the given market state.
    #[inline]
    pub fn inputs(&self, spot: f64, rate: f64, volatility: f64, expiry: f64) -> PricingInputs {
        PricingInputs::new(spot, self.strike, rate, volatility, expiry, self.is_call)
    }
}
