//! The pricing capability shared by every valuation model.
//!
//! Models are dispatched statically: each variant implements
//! [`OptionPricer`], and the closed set of variants is an enum in
//! `pricer_pricing` that implements the trait by delegation.
//!
//! ## Important
//! Prefer enum dispatch over `Box<dyn OptionPricer>` in hot paths.

pub mod pricer;

pub use pricer::{ensure_finite, near_expiry_price, OptionPricer, NEAR_EXPIRY_THRESHOLD};
