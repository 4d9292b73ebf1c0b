//! Black-Scholes pricing model for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! **Delta**: N(d₁) for a call, N(d₁) - 1 for a put.

use pricer_core::math::distributions::{norm_cdf, norm_pdf};
use pricer_core::math::payoff::{forward_delta, forward_value};
use pricer_core::traits::{ensure_finite, near_expiry_price, OptionPricer};
use pricer_core::types::{PricingError, PricingInputs};

/// Closed-form Black-Scholes model.
///
/// Stateless: every market parameter arrives with the call.
///
/// # Examples
/// ```
/// use pricer_core::traits::OptionPricer;
/// use pricer_core::types::PricingInputs;
/// use pricer_models::analytical::BlackScholes;
///
/// let call = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true);
/// let put = call.with_call(false);
///
/// let c = BlackScholes.price(&call).unwrap();
/// let p = BlackScholes.price(&put).unwrap();
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = c - p - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlackScholes;

impl BlackScholes {
    /// Computes the d1 term.
    ///
    /// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
    ///
    /// Only meaningful for σ > 0 and T > 0.
    #[inline]
    pub fn d1(inputs: &PricingInputs) -> f64 {
        let vol_sqrt_t = inputs.volatility * inputs.expiry.sqrt();
        let log_moneyness = (inputs.spot / inputs.strike).ln();
        let drift = (inputs.rate + 0.5 * inputs.volatility * inputs.volatility) * inputs.expiry;
        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes the d2 term: d₂ = d₁ - σ√T.
    #[inline]
    pub fn d2(inputs: &PricingInputs) -> f64 {
        Self::d1(inputs) - inputs.volatility * inputs.expiry.sqrt()
    }

    /// Gamma (∂²V/∂S²) = φ(d₁) / (S·σ·√T), identical for calls and puts.
    ///
    /// Zero at or inside the near-expiry threshold and for zero volatility.
    pub fn gamma(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        if near_expiry_price(inputs)?.is_some() || inputs.volatility == 0.0 {
            return Ok(0.0);
        }
        let vol_sqrt_t = inputs.volatility * inputs.expiry.sqrt();
        ensure_finite(
            "Black-Scholes gamma",
            norm_pdf(Self::d1(inputs)) / (inputs.spot * vol_sqrt_t),
        )
    }
}

impl OptionPricer for BlackScholes {
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        if let Some(intrinsic) = near_expiry_price(inputs)? {
            return Ok(intrinsic);
        }
        if inputs.volatility == 0.0 {
            return Ok(forward_value(inputs));
        }

        let d1 = Self::d1(inputs);
        let d2 = d1 - inputs.volatility * inputs.expiry.sqrt();
        let discounted_strike = inputs.strike * inputs.discount_factor();

        let value = if inputs.is_call {
            inputs.spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2)
        } else {
            discounted_strike * norm_cdf(-d2) - inputs.spot * norm_cdf(-d1)
        };
        ensure_finite("Black-Scholes price", value)
    }

    fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        if near_expiry_price(inputs)?.is_some() {
            return Ok(0.0);
        }
        if inputs.volatility == 0.0 {
            return Ok(forward_delta(inputs));
        }

        let n_d1 = norm_cdf(Self::d1(inputs));
        let delta = if inputs.is_call { n_d1 } else { n_d1 - 1.0 };
        ensure_finite("Black-Scholes delta", delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atm_call() -> PricingInputs {
        PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true)
    }

    // ==========================================================
    // Price Tests
    // ==========================================================

    #[test]
    fn test_call_price_reference_value() {
        // Hull reference: S=K=100, r=5%, σ=20%, T=1
        let price = BlackScholes.price(&atm_call()).unwrap();
        assert_relative_eq!(price, 10.450_583_572, epsilon = 1e-4);
    }

    #[test]
    fn test_put_price_reference_value() {
        let price = BlackScholes.price(&atm_call().with_call(false)).unwrap();
        assert_relative_eq!(price, 5.573_526_022, epsilon = 1e-4);
    }

    #[test]
    fn test_d1_d2_relationship() {
        let inputs = atm_call();
        assert_relative_eq!(
            BlackScholes::d1(&inputs) - BlackScholes::d2(&inputs),
            0.2,
            epsilon = 1e-12
        );
        // ATM: d1 = (r + σ²/2)T / σ√T = 0.35
        assert_relative_eq!(BlackScholes::d1(&inputs), 0.35, epsilon = 1e-12);
    }

    #[test]
    fn test_put_call_parity_negative_rate() {
        let call = PricingInputs { rate: -0.02, ..atm_call() };
        let c = BlackScholes.price(&call).unwrap();
        let p = BlackScholes.price(&call.with_call(false)).unwrap();
        assert_relative_eq!(c - p, 100.0 - 100.0 * 0.02_f64.exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_deep_otm_call_is_negligible() {
        let inputs = PricingInputs { strike: 400.0, expiry: 0.1, ..atm_call() };
        let price = BlackScholes.price(&inputs).unwrap();
        assert!(price.abs() < 1e-8);
    }

    #[test]
    fn test_near_expiry_returns_intrinsic() {
        let itm = PricingInputs { spot: 110.0, expiry: 0.001, ..atm_call() };
        assert_eq!(BlackScholes.price(&itm).unwrap(), 10.0);
        assert_eq!(BlackScholes.delta(&itm).unwrap(), 0.0);
        assert_eq!(BlackScholes.price(&itm.with_call(false)).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_volatility_uses_forward() {
        let inputs = PricingInputs { volatility: 0.0, ..atm_call() };
        assert_relative_eq!(
            BlackScholes.price(&inputs).unwrap(),
            100.0 - 100.0 * (-0.05_f64).exp(),
            epsilon = 1e-12
        );
        assert_eq!(BlackScholes.delta(&inputs).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let bad = PricingInputs { spot: 0.0, ..atm_call() };
        assert!(matches!(
            BlackScholes.price(&bad),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            BlackScholes.delta(&bad),
            Err(PricingError::InvalidInput(_))
        ));
    }

    // ==========================================================
    // Greeks Tests
    // ==========================================================

    #[test]
    fn test_delta_call_put_relationship() {
        let call = atm_call();
        let dc = BlackScholes.delta(&call).unwrap();
        let dp = BlackScholes.delta(&call.with_call(false)).unwrap();
        assert_relative_eq!(dc - dp, 1.0, epsilon = 1e-12);
        assert!((0.0..=1.0).contains(&dc));
    }

    #[test]
    fn test_delta_vs_finite_diff() {
        let inputs = atm_call();
        let h = 0.01;
        let up = BlackScholes.price(&inputs.with_spot(100.0 + h)).unwrap();
        let down = BlackScholes.price(&inputs.with_spot(100.0 - h)).unwrap();
        let fd = (up - down) / (2.0 * h);
        assert_relative_eq!(BlackScholes.delta(&inputs).unwrap(), fd, epsilon = 1e-4);
    }

    #[test]
    fn test_gamma_maximum_near_atm() {
        let atm = BlackScholes.gamma(&atm_call()).unwrap();
        let otm = BlackScholes.gamma(&atm_call().with_spot(70.0)).unwrap();
        assert!(atm > otm);
        assert!(otm >= 0.0);
    }

    #[test]
    fn test_name() {
        assert_eq!(BlackScholes.name(), "Black-Scholes");
    }
}
