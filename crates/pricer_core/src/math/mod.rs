//! Mathematical building blocks shared by the valuation models.
//!
//! - [`distributions`]: standard normal CDF/PDF via the complementary error function
//! - [`payoff`]: intrinsic value and zero-volatility forward valuation

pub mod distributions;
pub mod payoff;

pub use distributions::{norm_cdf, norm_pdf};
pub use payoff::{forward_delta, forward_value, intrinsic_value};
