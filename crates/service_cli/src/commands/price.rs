//! Price command implementation
//!
//! Prices the configured option once, from market values given on the
//! command line.

use pricer_core::traits::OptionPricer;
use pricer_core::types::{time_to_expiry, Date, PricingInputs, QuoteDate};
use serde::Serialize;
use tracing::info;

use super::OutputFormat;
use crate::config::{BacktestConfig, ModelEntry};
use crate::{CliError, Result};

/// Market state and overrides for a one-off price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    /// Underlying spot
    pub spot: f64,
    /// Risk-free rate, decimal
    pub rate: f64,
    /// Volatility, decimal
    pub volatility: f64,
    /// Strike; the configured strike when absent
    pub strike: Option<f64>,
    /// Price a put instead of the configured kind
    pub put: bool,
    /// Years to expiry
    pub years: Option<f64>,
    /// Valuation date, measured against the configured expiry
    pub date: Option<String>,
    /// Model to price with
    pub model: ModelEntry,
}

/// A priced option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Model display name
    pub model: String,
    /// Inputs the model saw
    pub inputs: PricingInputs,
    /// Fair value
    pub price: f64,
    /// Delta
    pub delta: f64,
}

/// Run the price command
pub fn run(config: &BacktestConfig, request: &PriceRequest, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let quote = evaluate(config, request)?;
    info!(model = %quote.model, price = quote.price, delta = quote.delta, "Priced");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quote)?),
        OutputFormat::Table => {
            let kind = if quote.inputs.is_call { "Call" } else { "Put" };
            println!("\n┌────────────────┬────────────────┐");
            println!("│ Model          │ {:<14} │", quote.model);
            println!("│ Option         │ {:<14} │", kind);
            println!("│ Spot           │ {:<14.4} │", quote.inputs.spot);
            println!("│ Strike         │ {:<14.4} │", quote.inputs.strike);
            println!("│ Years          │ {:<14.6} │", quote.inputs.expiry);
            println!("├────────────────┼────────────────┤");
            println!("│ Price          │ {:<14.6} │", quote.price);
            println!("│ Delta          │ {:<14.6} │", quote.delta);
            println!("└────────────────┴────────────────┘");
        }
    }
    Ok(())
}

/// Resolves the request against the configuration and prices it.
pub fn evaluate(config: &BacktestConfig, request: &PriceRequest) -> Result<Quote> {
    let years = match (request.years, request.date.as_deref()) {
        (Some(years), None) => years,
        (None, Some(date)) => {
            let date = Date::parse(date)?;
            let t = time_to_expiry(
                &QuoteDate::Valid(date),
                config.option.expiry,
                config.day_count,
                config.date_policy,
            )?;
            if t.is_past_expiry() {
                return Err(CliError::InvalidArgument(format!(
                    "Valuation date {} is after expiry {}",
                    date, config.option.expiry
                )));
            }
            t.years()
        }
        (Some(_), Some(_)) => {
            return Err(CliError::InvalidArgument(
                "Give either --years or --date, not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(CliError::InvalidArgument(
                "One of --years or --date is required".to_string(),
            ))
        }
    };

    let inputs = PricingInputs::new(
        request.spot,
        request.strike.unwrap_or(config.option.strike),
        request.rate,
        request.volatility,
        years,
        config.option.is_call && !request.put,
    );
    let model = request.model.build().map_err(CliError::Model)?;
    let result = model.evaluate(&inputs)?;

    Ok(Quote {
        model: model.name().to_string(),
        inputs,
        price: result.fair_value,
        delta: result.delta,
    })
}
