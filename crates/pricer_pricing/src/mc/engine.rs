//! Multi-threaded Monte Carlo pricer for European options.
//!
//! Paths follow geometric Brownian motion under the risk-neutral measure:
//!
//! S_{t+dt} = S_t · exp((r - σ²/2)·dt + σ·√dt·Z),  Z ~ N(0, 1)
//!
//! The requested path count is split evenly across the worker pool; the
//! remainder is dropped. Each worker simulates its share with its own
//! generator and returns a partial sum. The caller divides the combined sum by
//! the effective path count and discounts once by e^(-rT).

use pricer_core::math::payoff::intrinsic_value;
use pricer_core::traits::{ensure_finite, near_expiry_price, OptionPricer};
use pricer_core::types::{PricingError, PricingInputs};

use super::config::MonteCarloConfig;
use super::error::McError;
use crate::pool::WorkerPool;
use crate::rng::PricerRng;

/// Relative spot bump used by [`MonteCarloEngine::delta`].
pub const DELTA_BUMP: f64 = 0.01;

/// Result of one Monte Carlo valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McEstimate {
    /// Discounted mean payoff.
    pub price: f64,
    /// Standard error of `price`.
    pub std_error: f64,
    /// Paths averaged over; zero when the intrinsic short-cut applied.
    pub effective_paths: usize,
}

/// Running payoff sums of one worker.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PayoffSums {
    sum: f64,
    sum_sq: f64,
}

impl PayoffSums {
    fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }
}

/// Monte Carlo pricing model.
///
/// Owns its worker pool; clones share it, so an engine can be cloned into
/// several backtests without spawning more threads.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PricingInputs;
/// use pricer_pricing::mc::{MonteCarloConfig, MonteCarloEngine};
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(40_000)
///     .n_steps(1)
///     .workers(4)
///     .build()
///     .unwrap();
/// let engine = MonteCarloEngine::new(config).unwrap();
///
/// let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true);
/// let estimate = engine.estimate(&inputs, 0).unwrap();
///
/// // Black-Scholes value is 10.4506
/// assert!((estimate.price - 10.4506).abs() < 4.0 * estimate.std_error);
/// assert_eq!(estimate.effective_paths, 40_000);
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    config: MonteCarloConfig,
    pool: WorkerPool,
}

impl MonteCarloEngine {
    /// Starts an engine with its own worker pool.
    ///
    /// # Errors
    /// `McError::Config` if the configuration fails validation,
    /// `McError::Pool` if the worker threads cannot be started.
    pub fn new(config: MonteCarloConfig) -> Result<Self, McError> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers())?;
        tracing::debug!(
            paths = config.n_paths(),
            effective_paths = config.effective_paths(),
            steps = config.n_steps(),
            workers = config.workers(),
            seed = config.seed(),
            "Monte Carlo engine ready"
        );
        Ok(Self { config, pool })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Values the option with the `run`-th family of worker seeds.
    ///
    /// The same `(inputs, run)` always yields the same estimate.
    ///
    /// # Errors
    /// `PricingError::InvalidInput` for out-of-domain inputs,
    /// `PricingError::NumericalInstability` if the estimate is not finite.
    pub fn estimate(&self, inputs: &PricingInputs, run: u64) -> Result<McEstimate, PricingError> {
        if let Some(intrinsic) = near_expiry_price(inputs)? {
            return Ok(McEstimate {
                price: intrinsic,
                std_error: 0.0,
                effective_paths: 0,
            });
        }

        let per_worker = self.config.paths_per_worker();
        let sums = self.pool.map_reduce(
            |worker| {
                let seed = self.config.worker_seed(run, worker);
                self.simulate_worker(inputs, seed, per_worker)
            },
            PayoffSums::default(),
            PayoffSums::merge,
        );

        let n = self.config.effective_paths() as f64;
        let discount = inputs.discount_factor();
        let mean = sums.sum / n;
        let variance = if n > 1.0 {
            ((sums.sum_sq / n - mean * mean) * n / (n - 1.0)).max(0.0)
        } else {
            0.0
        };

        Ok(McEstimate {
            price: ensure_finite("Monte Carlo price", mean * discount)?,
            std_error: discount * (variance / n).sqrt(),
            effective_paths: self.config.effective_paths(),
        })
    }

    /// Simulates `n_paths` paths with one generator and sums the
    /// undiscounted terminal payoffs.
    fn simulate_worker(&self, inputs: &PricingInputs, seed: u64, n_paths: usize) -> PayoffSums {
        let mut rng = PricerRng::from_seed(seed);
        let n_steps = self.config.n_steps();
        let dt = inputs.expiry / n_steps as f64;
        let drift = (inputs.rate - 0.5 * inputs.volatility * inputs.volatility) * dt;
        let diffusion = inputs.volatility * dt.sqrt();

        let mut sums = PayoffSums::default();
        for _ in 0..n_paths {
            let mut spot = inputs.spot;
            for _ in 0..n_steps {
                spot *= (drift + diffusion * rng.gen_normal()).exp();
            }
            let payoff = intrinsic_value(spot, inputs.strike, inputs.is_call);
            sums.sum += payoff;
            sums.sum_sq += payoff * payoff;
        }
        sums
    }
}

impl OptionPricer for MonteCarloEngine {
    fn name(&self) -> &'static str {
        "Monte Carlo"
    }

    fn price(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        Ok(self.estimate(inputs, 0)?.price)
    }

    /// Forward difference over two independent simulations:
    /// `(P(S + h) - P(S)) / h` with `h = 0.01·S`. The bumped leg uses the next
    /// seed family, so the two runs share no random numbers.
    fn delta(&self, inputs: &PricingInputs) -> Result<f64, PricingError> {
        if near_expiry_price(inputs)?.is_some() {
            return Ok(0.0);
        }
        let h = DELTA_BUMP * inputs.spot;
        let base = self.estimate(inputs, 0)?.price;
        let bumped = self.estimate(&inputs.with_spot(inputs.spot + h), 1)?.price;
        ensure_finite("Monte Carlo delta", (bumped - base) / h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(paths: usize, steps: usize, workers: usize) -> MonteCarloEngine {
        let config = MonteCarloConfig::builder()
            .n_paths(paths)
            .n_steps(steps)
            .workers(workers)
            .build()
            .unwrap();
        MonteCarloEngine::new(config).unwrap()
    }

    fn atm_call() -> PricingInputs {
        PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true)
    }

    #[test]
    fn test_same_run_is_bit_identical() {
        let mc = engine(2_000, 10, 3);
        let a = mc.estimate(&atm_call(), 0).unwrap();
        let b = mc.estimate(&atm_call(), 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(mc.price(&atm_call()).unwrap(), a.price);
    }

    #[test]
    fn test_runs_draw_different_numbers() {
        let mc = engine(2_000, 10, 2);
        let run0 = mc.estimate(&atm_call(), 0).unwrap();
        let run1 = mc.estimate(&atm_call(), 1).unwrap();
        assert_ne!(run0.price, run1.price);
    }

    #[test]
    fn test_effective_paths_drop_remainder() {
        let mc = engine(1_001, 1, 4);
        let estimate = mc.estimate(&atm_call(), 0).unwrap();
        assert_eq!(estimate.effective_paths, 1_000);
    }

    #[test]
    fn test_near_expiry_short_circuit() {
        let mc = engine(100, 5, 2);
        let inputs = atm_call().with_spot(104.0).with_expiry(0.0);
        let estimate = mc.estimate(&inputs, 0).unwrap();
        assert_eq!(estimate.price, 4.0);
        assert_eq!(estimate.effective_paths, 0);
        assert_eq!(mc.delta(&inputs).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_volatility_is_deterministic_forward() {
        let mc = engine(100, 4, 2);
        let inputs = PricingInputs {
            volatility: 0.0,
            ..atm_call()
        };
        let estimate = mc.estimate(&inputs, 0).unwrap();
        let expected = 100.0 - 100.0 * (-0.05_f64).exp();
        assert!((estimate.price - expected).abs() < 1e-9);
        assert!(estimate.std_error < 1e-6);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mc = engine(100, 1, 1);
        let bad = atm_call().with_spot(f64::NAN);
        assert!(matches!(mc.price(&bad), Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn test_clones_share_config_and_results() {
        let mc = engine(1_000, 2, 2);
        let clone = mc.clone();
        assert_eq!(clone.config(), mc.config());
        assert_eq!(
            clone.price(&atm_call()).unwrap(),
            mc.price(&atm_call()).unwrap()
        );
    }

    #[test]
    fn test_put_prices_positive() {
        let mc = engine(4_000, 5, 2);
        let put = mc.price(&atm_call().with_call(false)).unwrap();
        assert!(put > 0.0);
        let delta = mc.delta(&atm_call().with_call(false)).unwrap();
        assert!(delta.is_finite());
    }
}
