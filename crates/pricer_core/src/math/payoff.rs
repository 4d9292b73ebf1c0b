//! Payoff helpers shared by the valuation models.
//!
//! - [`intrinsic_value`]: immediate-exercise value, used at and below the
//!   near-expiry threshold and for lattice/Monte Carlo terminal payoffs
//! - [`forward_value`] / [`forward_delta`]: the zero-volatility limit, where the
//!   underlying grows deterministically at the risk-free rate

use crate::types::PricingInputs;

/// Immediate-exercise payoff of a vanilla option.
///
/// - Call: max(S - K, 0)
/// - Put: max(K - S, 0)
///
/// # Examples
/// ```
/// use pricer_core::math::payoff::intrinsic_value;
///
/// assert_eq!(intrinsic_value(110.0, 100.0, true), 10.0);
/// assert_eq!(intrinsic_value(110.0, 100.0, false), 0.0);
/// ```
#[inline]
pub fn intrinsic_value(spot: f64, strike: f64, is_call: bool) -> f64 {
    if is_call {
        (spot - strike).max(0.0)
    } else {
        (strike - spot).max(0.0)
    }
}

/// Option value when volatility is zero.
///
/// The terminal spot is `S·e^{rT}` with certainty, so the present value is the
/// discounted intrinsic value against the forward:
/// - Call: max(S - K·e^{-rT}, 0)
/// - Put: max(K·e^{-rT} - S, 0)
#[inline]
pub fn forward_value(inputs: &PricingInputs) -> f64 {
    let discounted_strike = inputs.strike * (-inputs.rate * inputs.expiry).exp();
    intrinsic_value(inputs.spot, discounted_strike, inputs.is_call)
}

/// Spot sensitivity of [`forward_value`].
///
/// A step function: 1 (call) or -1 (put) when in the money against the
/// discounted strike, otherwise 0.
#[inline]
pub fn forward_delta(inputs: &PricingInputs) -> f64 {
    let discounted_strike = inputs.strike * (-inputs.rate * inputs.expiry).exp();
    match (inputs.is_call, inputs.spot > discounted_strike) {
        (true, true) => 1.0,
        (false, false) if inputs.spot < discounted_strike => -1.0,
        _ => 0.0,
    }
}
