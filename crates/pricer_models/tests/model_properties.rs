//! Cross-model properties of the deterministic pricers.

use approx::assert_relative_eq;
use pricer_core::traits::{OptionPricer, NEAR_EXPIRY_THRESHOLD};
use pricer_core::types::PricingInputs;
use pricer_models::analytical::BlackScholes;
use pricer_models::lattice::BinomialTree;
use proptest::prelude::*;

/// Lattice error shrinks as steps grow from 50 to 2000.
#[test]
fn test_lattice_converges_to_closed_form() {
    for inputs in [
        PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true),
        PricingInputs::new(100.0, 110.0, 0.03, 0.3, 0.5, false),
        PricingInputs::new(155.0, 100.0, 0.05, 0.2, 0.58, true),
    ] {
        let reference = BlackScholes.price(&inputs).unwrap();
        let coarse = BinomialTree::new(50).unwrap().price(&inputs).unwrap();
        let fine = BinomialTree::new(2000).unwrap().price(&inputs).unwrap();

        assert!((coarse - reference).abs() < 0.1, "coarse {} vs {}", coarse, reference);
        assert!((fine - reference).abs() < 0.01, "fine {} vs {}", fine, reference);
        assert!((fine - reference).abs() <= (coarse - reference).abs() + 1e-9);
    }
}

/// Both models return intrinsic value and zero delta at the threshold.
#[test]
fn test_models_agree_at_expiry() {
    let tree = BinomialTree::new(100).unwrap();
    let models: [&dyn OptionPricer; 2] = [&BlackScholes, &tree];

    for model in models {
        for (spot, is_call, intrinsic) in [
            (120.0, true, 20.0),
            (80.0, true, 0.0),
            (80.0, false, 20.0),
            (120.0, false, 0.0),
        ] {
            let inputs =
                PricingInputs::new(spot, 100.0, 0.05, 0.2, NEAR_EXPIRY_THRESHOLD, is_call);
            let result = model.evaluate(&inputs).unwrap();
            assert_eq!(result.fair_value, intrinsic, "{}", model.name());
            assert_eq!(result.delta, 0.0, "{}", model.name());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// C - P = S - K·e^{-rT} for the closed form.
    #[test]
    fn prop_put_call_parity(
        spot in 20.0f64..300.0,
        strike in 20.0f64..300.0,
        rate in -0.02f64..0.10,
        vol in 0.01f64..1.0,
        expiry in 0.01f64..5.0,
    ) {
        let call = PricingInputs::new(spot, strike, rate, vol, expiry, true);
        let c = BlackScholes.price(&call).unwrap();
        let p = BlackScholes.price(&call.with_call(false)).unwrap();
        let forward = spot - strike * (-rate * expiry).exp();
        prop_assert!((c - p - forward).abs() < 1e-9 * spot.max(strike));
    }

    /// Call delta in [0, 1], put delta in [-1, 0].
    #[test]
    fn prop_delta_bounds(
        spot in 20.0f64..300.0,
        vol in 0.0f64..1.0,
        expiry in 0.0f64..3.0,
    ) {
        let call = PricingInputs::new(spot, 100.0, 0.05, vol, expiry, true);
        let dc = BlackScholes.delta(&call).unwrap();
        let dp = BlackScholes.delta(&call.with_call(false)).unwrap();
        prop_assert!((0.0..=1.0).contains(&dc));
        prop_assert!((-1.0..=0.0).contains(&dp));
    }

    /// Lattice and closed form stay close for moderate parameters.
    #[test]
    fn prop_lattice_tracks_closed_form(
        spot in 60.0f64..160.0,
        vol in 0.1f64..0.5,
        expiry in 0.1f64..2.0,
        is_call in any::<bool>(),
    ) {
        let inputs = PricingInputs::new(spot, 100.0, 0.04, vol, expiry, is_call);
        let tree = BinomialTree::new(400).unwrap().price(&inputs).unwrap();
        let closed = BlackScholes.price(&inputs).unwrap();
        prop_assert!((tree - closed).abs() < 0.05, "tree {} closed {}", tree, closed);
    }
}

#[test]
fn test_lattice_delta_tracks_closed_form() {
    let inputs = PricingInputs::new(155.0, 100.0, 0.05, 0.2, 0.58, true);
    let tree = BinomialTree::new(1000).unwrap().delta(&inputs).unwrap();
    let closed = BlackScholes.delta(&inputs).unwrap();
    assert_relative_eq!(tree, closed, epsilon = 5e-3);
}
