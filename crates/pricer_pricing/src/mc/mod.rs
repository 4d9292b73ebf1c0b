//! Monte Carlo pricing.
//!
//! - [`MonteCarloConfig`]: validated simulation parameters (builder)
//! - [`MonteCarloEngine`]: GBM simulation over a [`WorkerPool`](crate::pool::WorkerPool)
//! - [`McEstimate`]: price with standard error and effective path count

mod config;
mod engine;
mod error;

pub use config::{MonteCarloConfig, MonteCarloConfigBuilder, DEFAULT_SEED, MAX_PATHS, MAX_STEPS};
pub use engine::{McEstimate, MonteCarloEngine, DELTA_BUMP};
pub use error::{ConfigError, McError};
