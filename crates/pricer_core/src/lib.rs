//! # pricer_core: Foundation for the Delta-Hedge Backtester
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Standard normal distribution functions (`math::distributions`)
//! - Payoff helpers shared by every valuation model (`math::payoff`)
//! - The pricing capability trait `OptionPricer` (`traits`)
//! - Time types: `Date`, `QuoteDate`, `DayCountConvention`, time-to-expiry (`types::time`)
//! - Pricing inputs and results (`types::inputs`)
//! - Market quotes (`types::quote`)
//! - Error types: `PricingError`, `DateError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::distributions::norm_cdf;
//! use pricer_core::types::{Date, DayCountConvention, PricingInputs};
//!
//! // Date operations
//! let quote = Date::from_ymd(2024, 6, 1).unwrap();
//! let expiry = Date::from_ymd(2024, 12, 30).unwrap();
//! let t = DayCountConvention::Actual36525.year_fraction_dates(quote, expiry);
//! assert!(t > 0.5 && t < 0.6);
//!
//! // Inputs for a single pricing call
//! let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, t, true);
//! assert!(inputs.validate().is_ok());
//!
//! // N(0) = 0.5
//! assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for Date and DayCountConvention

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
