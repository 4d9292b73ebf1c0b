//! Random number generation for Monte Carlo simulations.
//!
//! Each Monte Carlo worker owns one [`PricerRng`]; generators are never
//! shared between threads.

mod prng;

pub use prng::PricerRng;
