//! # Pricer Pricing (Layer 3: Engines)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing hosts the Monte Carlo model and the closed set of models
//! the backtester can drive:
//! - [`rng::PricerRng`]: seeded PRNG with standard normal sampling
//! - [`pool::WorkerPool`]: fixed-size map-reduce over a dedicated rayon pool
//! - [`mc::MonteCarloEngine`]: GBM path simulation split across workers
//! - [`PricingModel`]: enum over Black-Scholes, binomial tree and Monte Carlo
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::traits::OptionPricer;
//! use pricer_core::types::PricingInputs;
//! use pricer_pricing::mc::MonteCarloConfig;
//! use pricer_pricing::PricingModel;
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(20_000)
//!     .n_steps(1)
//!     .workers(2)
//!     .build()
//!     .unwrap();
//! let mc = PricingModel::monte_carlo(config).unwrap();
//! let bs = PricingModel::black_scholes();
//!
//! let inputs = PricingInputs::new(100.0, 100.0, 0.05, 0.2, 1.0, true);
//! let diff = mc.price(&inputs).unwrap() - bs.price(&inputs).unwrap();
//! assert!(diff.abs() < 0.5);
//! ```
//!
//! ## Reproducibility
//!
//! Every worker draws from its own generator seeded with
//! `base_seed + run * workers + worker`. Partial sums are reduced in worker
//! order, so a fixed configuration gives bit-identical prices on every call.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod model;
pub mod pool;
pub mod rng;

pub use model::PricingModel;
