//! The `OptionPricer` capability.

use crate::math::payoff::intrinsic_value;
use crate::types::{PricingError, PricingInputs, PricingResult};

/// Time to expiry, in years, at or below which every model returns intrinsic
/// value and zero delta.
pub const NEAR_EXPIRY_THRESHOLD: f64 = 0.001;

/// A vanilla option valuation model.
///
/// Implementations are immutable after construction and may be shared
/// across threads and backtests.
///
/// # Contract
/// - Inputs are validated first ([`PricingInputs::validate`]).
/// - At `expiry <= NEAR_EXPIRY_THRESHOLD`, `price` returns intrinsic value
///   and `delta` returns zero.
/// - Otherwise the model's own algorithm applies.
///
/// # Examples
/// ```
/// use pricer_core::traits::OptionPricer;
/// use pricer_core::types::{PricingError, PricingInputs};
///
/// /// Prices every option at its intrinsic value.
/// struct Intrinsic;
///
/// impl OptionPricer for Intrinsic {
///     fn name(&self) -> &'static str {
///         "Intrinsic"
///     }
///
///     fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
///         inputs.validate()?;
///         Ok(pricer_core::math::intrinsic_value(inputs.spot, inputs.strike, inputs.is_call))
///     }
///
///     fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
///         inputs.validate()?;
///         Ok(0.0)
///     }
/// }
///
/// let result = Intrinsic
///     .evaluate(&PricingInputs::new(110.0, 100.0, 0.05, 0.2, 0.5, true))
///     .unwrap();
/// assert_eq!(result.fair_value, 10.0);
/// ```
pub trait OptionPricer: Send + Sync {
    /// Display name, used in logs and output file names.
    fn name(&self) -> &'static str;

    /// Fair value of the option.
    fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError>;

    /// Sensitivity of the fair value to spot.
    fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError>;

    /// Fair value and delta together.
    fn evaluate(&self, inputs: &PricingInputs) -> Result<PricingResult, PricingError> {
        Ok(PricingResult {
            fair_value: self.price(inputs)?,
            delta: self.delta(inputs)?,
        })
    }
}

/// Validates `inputs` and returns the intrinsic value when the option is at
/// or inside the near-expiry threshold.
///
/// Models call this at the top of `price`: `Ok(Some(v))` short-circuits,
/// `Ok(None)` means the model's own algorithm should run.
pub fn near_expiry_price(inputs: &PricingInputs) -> Result<Option<f64>, PricingError> {
    inputs.validate()?;
    Ok(inputs
        .is_near_expiry()
        .then(|| intrinsic_value(inputs.spot, inputs.strike, inputs.is_call)))
}

/// Maps a non-finite model output to `PricingError::NumericalInstability`.
pub fn ensure_finite(what: &str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::NumericalInstability(format!(
            "{} is not finite ({})",
            what, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl OptionPricer for Constant {
        fn name(&self) -> &'static str {
            "Constant"
        }

        fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
            match near_expiry_price(inputs)? {
                Some(intrinsic) => Ok(intrinsic),
                None => Ok(self.0),
            }
        }

        fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
            inputs.validate()?;
            Ok(if inputs.is_near_expiry() { 0.0 } else { 0.5 })
        }
    }

    #[test]
    fn test_evaluate_combines_price_and_delta() {
        let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true);
        let result = Constant(7.0).evaluate(&inputs).unwrap();
        assert_eq!(result.fair_value, 7.0);
        assert_eq!(result.delta, 0.5);
    }

    #[test]
    fn test_near_expiry_price_short_circuits() {
        let inputs = PricingInputs::new(90.0, 100.0, 0.05, 0.2, 0.0005, false);
        assert_eq!(near_expiry_price(&inputs).unwrap(), Some(10.0));
        assert_eq!(near_expiry_price(&inputs.with_expiry(0.5)).unwrap(), None);
    }

    #[test]
    fn test_evaluate_propagates_invalid_input() {
        let inputs = PricingInputs::new(-1.0, 100.0, 0.05, 0.2, 1.0, true);
        assert!(matches!(
            Constant(1.0).evaluate(&inputs),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("price", 1.5).unwrap(), 1.5);
        assert!(matches!(
            ensure_finite("price", f64::NAN),
            Err(PricingError::NumericalInstability(_))
        ));
    }

    #[test]
    fn test_pricer_is_object_safe() {
        let models: Vec<Box<dyn OptionPricer>> = vec![Box::new(Constant(1.0))];
        assert_eq!(models[0].name(), "Constant");
    }
}
