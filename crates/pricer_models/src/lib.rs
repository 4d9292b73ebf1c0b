//! # Pricer Models (L2: Business Logic)
//!
//! The option being hedged and the deterministic valuation models.
//!
//! This crate provides:
//! - [`instruments::OptionContract`]: strike, expiry date and call/put flag
//! - [`analytical::BlackScholes`]: closed-form European pricing
//! - [`lattice::BinomialTree`]: Cox-Ross-Rubinstein binomial lattice
//!
//! Both models implement [`pricer_core::traits::OptionPricer`]. The Monte Carlo
//! model lives in `pricer_pricing`, next to the worker pool it needs.
//!
//! ## Design Principles
//!
//! - **Immutable models**: construction parameters never change, so one
//!   instance can be shared across threads and backtests
//! - **Validated construction**: bad parameters fail at `new`, not at pricing

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod lattice;
