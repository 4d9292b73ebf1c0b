//! Monte Carlo simulation configuration.

use super::error::ConfigError;
use crate::pool::default_worker_count;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Base seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(5_000)
///     .n_steps(252)
///     .workers(4)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.paths_per_worker(), 1_250);
/// assert_eq!(config.effective_paths(), 5_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonteCarloConfig {
    /// Requested number of simulation paths.
    n_paths: usize,
    /// Number of time steps per path.
    n_steps: usize,
    /// Number of parallel workers.
    workers: usize,
    /// Base seed; worker seeds are derived from it.
    seed: u64,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the requested number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the number of workers.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Paths simulated by each worker: `n_paths / workers`, rounded down.
    #[inline]
    pub fn paths_per_worker(&self) -> usize {
        self.n_paths / self.workers
    }

    /// Paths actually simulated and averaged over. The remainder of
    /// `n_paths / workers` is dropped.
    #[inline]
    pub fn effective_paths(&self) -> usize {
        self.paths_per_worker() * self.workers
    }

    /// Seed for `worker` during the `run`-th simulation of a pricing call.
    ///
    /// `base_seed + run * workers + worker`, wrapping on overflow.
    #[inline]
    pub fn worker_seed(&self, run: u64, worker: usize) -> u64 {
        self.seed
            .wrapping_add(run.wrapping_mul(self.workers as u64))
            .wrapping_add(worker as u64)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than 10,000,000
    /// - `n_steps` is 0 or greater than 10,000
    /// - `workers` is 0
    /// - `n_paths` is smaller than `workers`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(self.workers));
        }
        if self.n_paths < self.workers {
            return Err(ConfigError::InsufficientPaths {
                paths: self.n_paths,
                workers: self.workers,
            });
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// `workers` defaults to the machine's available parallelism and `seed`
/// to [`DEFAULT_SEED`].
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    workers: Option<usize>,
    seed: Option<u64>,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths, in [1, 10_000_000].
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path, in [1, 10_000].
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the number of workers.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` or `n_steps` is not set, or if
    /// [`MonteCarloConfig::validate`] fails.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let n_steps = self.n_steps.ok_or(ConfigError::InvalidParameter {
            name: "n_steps",
            value: "must be specified".to_string(),
        })?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps,
            workers: self.workers.unwrap_or_else(default_worker_count),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = MonteCarloConfig::builder()
            .n_paths(10_000)
            .n_steps(252)
            .build()
            .unwrap();

        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.n_steps(), 252);
        assert_eq!(config.seed(), DEFAULT_SEED);
        assert_eq!(config.workers(), default_worker_count());
    }

    #[test]
    fn test_config_builder_missing_paths() {
        let result = MonteCarloConfig::builder().n_steps(10).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "n_paths",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_out_of_range_counts() {
        let build = |paths, steps, workers| {
            MonteCarloConfig::builder()
                .n_paths(paths)
                .n_steps(steps)
                .workers(workers)
                .build()
        };
        assert_eq!(build(0, 10, 1), Err(ConfigError::InvalidPathCount(0)));
        assert_eq!(
            build(MAX_PATHS + 1, 10, 1),
            Err(ConfigError::InvalidPathCount(MAX_PATHS + 1))
        );
        assert_eq!(build(100, 0, 1), Err(ConfigError::InvalidStepCount(0)));
        assert_eq!(build(100, 10, 0), Err(ConfigError::InvalidWorkerCount(0)));
        assert_eq!(
            build(3, 10, 4),
            Err(ConfigError::InsufficientPaths {
                paths: 3,
                workers: 4
            })
        );
    }

    #[test]
    fn test_remainder_paths_dropped() {
        let config = MonteCarloConfig::builder()
            .n_paths(5_001)
            .n_steps(1)
            .workers(4)
            .build()
            .unwrap();
        assert_eq!(config.paths_per_worker(), 1_250);
        assert_eq!(config.effective_paths(), 5_000);
    }

    #[test]
    fn test_worker_seeds_disjoint_across_runs() {
        let config = MonteCarloConfig::builder()
            .n_paths(100)
            .n_steps(1)
            .workers(3)
            .seed(42)
            .build()
            .unwrap();
        let run0: Vec<u64> = (0..3).map(|w| config.worker_seed(0, w)).collect();
        let run1: Vec<u64> = (0..3).map(|w| config.worker_seed(1, w)).collect();
        assert_eq!(run0, vec![42, 43, 44]);
        assert_eq!(run1, vec![45, 46, 47]);
    }

    #[test]
    fn test_worker_seed_wraps() {
        let config = MonteCarloConfig::builder()
            .n_paths(2)
            .n_steps(1)
            .workers(2)
            .seed(u64::MAX)
            .build()
            .unwrap();
        assert_eq!(config.worker_seed(0, 1), 0);
    }
}
