//! Arguments and result of a single pricing call.

use super::error::PricingError;
use crate::traits::NEAR_EXPIRY_THRESHOLD;

/// The six scalar arguments every pricing model takes.
///
/// Rate and volatility are decimal fractions (0.05 for 5%); `expiry` is the
/// remaining life in years.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingInputs;
///
/// let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 0.5, true);
/// assert!(inputs.validate().is_ok());
///
/// let bumped = inputs.with_spot(101.0);
/// assert_eq!(bumped.spot, 101.0);
/// assert_eq!(bumped.strike, inputs.strike);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingInputs {
    /// Spot price of the underlying (S)
    pub spot: f64,
    /// Strike price (K)
    pub strike: f64,
    /// Continuously compounded risk-free rate (r)
    pub rate: f64,
    /// Annualised volatility (σ)
    pub volatility: f64,
    /// Time to expiry in years (T)
    pub expiry: f64,
    /// Call if true, put otherwise
    pub is_call: bool,
}

impl PricingInputs {
    /// Bundles the pricing arguments. No validation is performed here.
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        expiry: f64,
        is_call: bool,
    ) -> Self {
        Self {
            spot,
            strike,
            rate,
            volatility,
            expiry,
            is_call,
        }
    }

    /// Copy with a different spot.
    #[inline]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    /// Copy with a different time to expiry.
    #[inline]
    pub fn with_expiry(self, expiry: f64) -> Self {
        Self { expiry, ..self }
    }

    /// Copy with the other option type.
    #[inline]
    pub fn with_call(self, is_call: bool) -> Self {
        Self { is_call, ..self }
    }

    /// Checks the domain every model shares.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for non-finite values, `S <= 0`, `K <= 0`
    /// or `σ < 0`. Zero volatility and any finite rate or expiry are accepted.
    pub fn validate(&self) -> Result<(), PricingError> {
        let fields = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("rate", self.rate),
            ("volatility", self.volatility),
            ("expiry", self.expiry),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricingError::InvalidInput(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if self.spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "strike must be positive, got {}",
                self.strike
            )));
        }
        if self.volatility < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        Ok(())
    }

    /// True when `expiry <= NEAR_EXPIRY_THRESHOLD`, where every model returns
    /// intrinsic value and zero delta.
    #[inline]
    pub fn is_near_expiry(&self) -> bool {
        self.expiry <= NEAR_EXPIRY_THRESHOLD
    }

    /// Discount factor e^{-rT}.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }
}

/// Fair value and delta from one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Model fair value
    pub fair_value: f64,
    /// Spot sensitivity, used as the hedge ratio
    pub delta: f64,
}
