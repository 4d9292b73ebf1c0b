//! Analytical pricing formulas for European options.
//!
//! ## Design Principles
//!
//! - **Numerical Stability**: Uses the erfc-based CDF from `pricer_core`
//! - **Explicit limits**: the near-expiry and zero-volatility cases are
//!   handled before the formula, never through NaN or infinities

pub mod black_scholes;

pub use black_scholes::BlackScholes;
