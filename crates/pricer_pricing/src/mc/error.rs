//! Error types for the Monte Carlo engine.
//!
//! Configuration errors occur when a [`MonteCarloConfig`](super::MonteCarloConfig)
//! is built; [`McError`] covers everything that can fail while starting an
//! engine.

use std::fmt;

use thiserror::Error;

use super::config::{MAX_PATHS, MAX_STEPS};
use crate::pool::PoolError;

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    InvalidPathCount(usize),
    /// Step count outside valid range [1, 10_000].
    InvalidStepCount(usize),
    /// Worker count of zero.
    InvalidWorkerCount(usize),
    /// Fewer paths than workers, which would leave every worker idle.
    InsufficientPaths {
        /// Requested path count.
        paths: usize,
        /// Worker count.
        workers: usize,
    },
    /// Invalid parameter value with name and description.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPathCount(count) => {
                write!(
                    f,
                    "Invalid path count {}: must be in range [1, {}]",
                    count, MAX_PATHS
                )
            }
            Self::InvalidStepCount(count) => {
                write!(
                    f,
                    "Invalid step count {}: must be in range [1, {}]",
                    count, MAX_STEPS
                )
            }
            Self::InvalidWorkerCount(count) => {
                write!(f, "Invalid worker count {}: must be at least 1", count)
            }
            Self::InsufficientPaths { paths, workers } => {
                write!(
                    f,
                    "Path count {} is smaller than worker count {}",
                    paths, workers
                )
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter '{}': {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised when starting a Monte Carlo engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum McError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The worker pool could not be started.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
