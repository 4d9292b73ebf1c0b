//! Cox-Ross-Rubinstein binomial tree.
//!
//! With `n` steps over the option's life:
//!
//! - dt = T / n
//! - u = e^(σ√dt), d = 1/u
//! - p = (e^(r·dt) - d) / (u - d)
//!
//! Terminal node `i` (counting down-moves) sits at S·u^(n-i)·d^i. Values are
//! rolled back with `v[i] = e^(-r·dt)·(p·v[i] + (1-p)·v[i+1])`, reusing one
//! buffer of length n + 1.
//!
//! `p` is not clamped: when `e^(r·dt)` leaves `[d, u]` the tree is no longer
//! arbitrage-free and prices are returned as computed.

use pricer_core::math::payoff::{forward_delta, forward_value, intrinsic_value};
use pricer_core::traits::{ensure_finite, near_expiry_price, OptionPricer};
use pricer_core::types::{PricingError, PricingInputs};

use super::error::LatticeError;

/// Largest step count accepted by [`BinomialTree::new`].
pub const MAX_LATTICE_STEPS: usize = 100_000;

/// Binomial lattice model with a fixed number of time steps.
///
/// # Examples
/// ```
/// use pricer_core::traits::OptionPricer;
/// use pricer_core::types::PricingInputs;
/// use pricer_models::lattice::BinomialTree;
///
/// let tree = BinomialTree::new(500).unwrap();
/// let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true);
///
/// // Converges to the Black-Scholes value 10.4506
/// let price = tree.price(&inputs).unwrap();
/// assert!((price - 10.4506).abs() < 0.01);
///
/// assert!(BinomialTree::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinomialTree {
    steps: usize,
}

impl BinomialTree {
    /// Creates a tree with `steps` time steps.
    ///
    /// # Errors
    /// `LatticeError::InvalidStepCount` if `steps` is zero or above
    /// [`MAX_LATTICE_STEPS`].
    pub fn new(steps: usize) -> Result<Self, LatticeError> {
        if steps == 0 || steps > MAX_LATTICE_STEPS {
            return Err(LatticeError::InvalidStepCount {
                steps,
                max: MAX_LATTICE_STEPS,
            });
        }
        Ok(Self { steps })
    }

    /// Number of time steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Length of one step for an option with `expiry` years left.
    #[inline]
    pub fn dt(&self, expiry: f64) -> f64 {
        expiry / self.steps as f64
    }

    /// Backward induction for validated inputs with σ > 0 and T above the
    /// near-expiry threshold.
    fn roll_back(&self, inputs: &PricingInputs) -> f64 {
        let n = self.steps;
        let dt = self.dt(inputs.expiry);
        let u = (inputs.volatility * dt.sqrt()).exp();
        let d = 1.0 / u;
        let p = ((inputs.rate * dt).exp() - d) / (u - d);
        let disc = (-inputs.rate * dt).exp();

        // Start at the top node and step down by d/u = d² per node.
        let down_ratio = d * d;
        let mut node_spot = inputs.spot * u.powi(n as i32);
        let mut values: Vec<f64> = Vec::with_capacity(n + 1);
        for _ in 0..=n {
            values.push(intrinsic_value(node_spot, inputs.strike, inputs.is_call));
            node_spot *= down_ratio;
        }

        for step in (0..n).rev() {
            for i in 0..=step {
                values[i] = disc * (p * values[i] + (1.0 - p) * values[i + 1]);
            }
        }
        values[0]
    }
}

impl OptionPricer for BinomialTree {
    fn name(&self) -> &'static str {
        "Binomial Tree"
    }

    fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        if let Some(intrinsic) = near_expiry_price(inputs)? {
            return Ok(intrinsic);
        }
        if inputs.volatility == 0.0 {
            return Ok(forward_value(inputs));
        }
        ensure_finite("Binomial price", self.roll_back(inputs))
    }

    /// Finite difference between the two first-step nodes, each priced on a
    /// fresh tree one step shorter: `(P(S·u, T-dt) - P(S·d, T-dt)) / (S·u - S·d)`.
    fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        if near_expiry_price(inputs)?.is_some() {
            return Ok(0.0);
        }
        if inputs.volatility == 0.0 {
            return Ok(forward_delta(inputs));
        }

        let dt = self.dt(inputs.expiry);
        let u = (inputs.volatility * dt.sqrt()).exp();
        let d = 1.0 / u;
        let (spot_up, spot_down) = (inputs.spot * u, inputs.spot * d);
        let remaining = inputs.with_expiry(inputs.expiry - dt);

        let up = self.price(&remaining.with_spot(spot_up))?;
        let down = self.price(&remaining.with_spot(spot_down))?;
        ensure_finite("Binomial delta", (up - down) / (spot_up - spot_down))
    }
}
