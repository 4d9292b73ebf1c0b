//! Recombining lattice models.
//!
//! - [`BinomialTree`]: Cox-Ross-Rubinstein tree with European exercise
//! - [`LatticeError`]: construction errors

pub mod binomial;
pub mod error;

pub use binomial::{BinomialTree, MAX_LATTICE_STEPS};
pub use error::LatticeError;
