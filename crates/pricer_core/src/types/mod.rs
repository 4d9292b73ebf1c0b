//! Core time, input, and error types.
//!
//! This module provides:
//! - `time`: Date wrappers, day count conventions and time-to-expiry computation
//! - `inputs`: The argument bundle and result of one pricing call
//! - `quote`: One dated market observation
//! - `error`: Structured error types for pricing and date operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level.

pub mod error;
pub mod inputs;
pub mod quote;
pub mod time;

pub use error::{DateError, PricingError};
pub use inputs::{PricingInputs, PricingResult};
pub use quote::MarketQuote;
pub use time::{
    time_to_expiry, Date, DayCountConvention, QuoteDate, TimeToExpiry, UnparseableDatePolicy,
};
