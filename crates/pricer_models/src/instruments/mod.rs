//! Instrument definitions.

pub mod contract;
pub mod error;

pub use contract::OptionContract;
pub use error::InstrumentError;
