//! Lattice construction errors.

use thiserror::Error;

/// Errors raised when building a lattice model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// Step count outside `[1, max]`.
    #[error("Invalid step count: {steps} (must be between 1 and {max})")]
    InvalidStepCount {
        /// The rejected step count
        steps: usize,
        /// Largest accepted step count
        max: usize,
    },
}
