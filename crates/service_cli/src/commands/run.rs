//! Run command implementation
//!
//! Replays every configured dataset through every configured model and
//! writes one result file per pair.

use std::path::PathBuf;

use adapter_feeds::QuoteFeed;
use pricer_models::instruments::OptionContract;
use pricer_pricing::PricingModel;
use pricer_risk::backtest::{create_result_file, BacktestObserver, Termination, TracingObserver};
use pricer_risk::{BacktestReport, Backtester};
use serde::Serialize;
use tracing::{error, info};

use super::{cell, OutputFormat};
use crate::config::{BacktestConfig, DatasetEntry, ModelEntry};
use crate::{CliError, Result};

/// Outcome of one dataset and model pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Dataset label
    pub dataset: String,
    /// Model display name, or the configured slug if it never ran
    pub model: String,
    /// Result file, when one was written
    pub output: Option<PathBuf>,
    /// `completed`, `expired`, `unavailable` or `failed`
    pub status: String,
    /// Records written
    pub records: usize,
    /// Rows skipped
    pub skipped: usize,
    /// Mean hedging error
    pub mean_error: Option<f64>,
    /// Sample standard deviation of the hedging error
    pub std_error: Option<f64>,
    /// Largest absolute hedging error
    pub max_abs_error: Option<f64>,
}

impl RunSummary {
    fn from_report(dataset: &DatasetEntry, output: PathBuf, report: &BacktestReport) -> Self {
        let has_errors = report.errors.count > 0;
        let status = match report.termination {
            Termination::SourceExhausted => "completed",
            Termination::ExpiryPassed { .. } => "expired",
        };
        Self {
            dataset: dataset.label(),
            model: report.model.clone(),
            output: Some(output),
            status: status.to_string(),
            records: report.records,
            skipped: report.skipped.len(),
            mean_error: has_errors.then_some(report.errors.mean),
            std_error: has_errors.then_some(report.errors.std_dev),
            max_abs_error: has_errors.then_some(report.errors.max_abs),
        }
    }

    fn without_report(dataset: &DatasetEntry, model: &str, status: &str) -> Self {
        Self {
            dataset: dataset.label(),
            model: model.to_string(),
            output: None,
            status: status.to_string(),
            records: 0,
            skipped: 0,
            mean_error: None,
            std_error: None,
            max_abs_error: None,
        }
    }
}

/// Run the backtest batch and print a summary.
pub fn run(config: &BacktestConfig, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let summaries = execute(config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Table => print_table(&summaries),
    }
    Ok(())
}

/// Runs the batch and returns one summary per attempted pair.
///
/// An unreadable dataset is logged and skipped; the batch carries on.
pub fn execute(config: &BacktestConfig) -> Result<Vec<RunSummary>> {
    let contract = config
        .contract()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let models = config
        .models
        .iter()
        .map(|entry| Ok((entry, entry.build().map_err(CliError::Model)?)))
        .collect::<Result<Vec<(&ModelEntry, PricingModel)>>>()?;

    std::fs::create_dir_all(&config.output_dir)?;
    info!(
        datasets = config.datasets.len(),
        models = models.len(),
        output_dir = %config.output_dir.display(),
        "Starting backtest batch"
    );

    let mut summaries = Vec::new();
    'datasets: for dataset in &config.datasets {
        for (entry, model) in &models {
            // The feed is opened before the result file is created, so an
            // unreadable source never leaves an empty result behind.
            let feed = match QuoteFeed::open(&dataset.path, dataset.layout) {
                Ok(feed) => feed,
                Err(err) => {
                    TracingObserver.on_source_unavailable(&dataset.path, &err);
                    summaries.push(RunSummary::without_report(dataset, "-", "unavailable"));
                    continue 'datasets;
                }
            };

            let output = config.output_dir.join(dataset.result_file_name(entry));
            let backtester = Backtester::new(model.clone(), contract)
                .with_convention(config.day_count)
                .with_date_policy(config.date_policy);
            match run_one(&backtester, feed, &output) {
                Ok(report) => {
                    info!(
                        dataset = %dataset.label(),
                        model = %report.model,
                        output = %output.display(),
                        "Result file written"
                    );
                    summaries.push(RunSummary::from_report(dataset, output, &report));
                }
                Err(err) => {
                    error!(
                        dataset = %dataset.label(),
                        model = entry.slug(),
                        error = %err,
                        "Backtest failed"
                    );
                    summaries.push(RunSummary::without_report(dataset, entry.slug(), "failed"));
                }
            }
        }
    }

    info!(runs = summaries.len(), "Backtest batch complete");
    Ok(summaries)
}

fn run_one(
    backtester: &Backtester<PricingModel>,
    feed: QuoteFeed<std::fs::File>,
    output: &std::path::Path,
) -> Result<BacktestReport> {
    let mut sink = create_result_file(output)?;
    Ok(backtester.run(feed, &mut sink, &TracingObserver)?)
}

fn print_table(summaries: &[RunSummary]) {
    println!(
        "\n{:<24} | {:<14} | {:<11} | {:>7} | {:>7} | {:>12} | {:>12} | {:>12}",
        "Dataset", "Model", "Status", "Records", "Skipped", "Mean Error", "Std Dev", "Max |Error|"
    );
    println!("{}", "-".repeat(122));
    for s in summaries {
        println!(
            "{:<24} | {:<14} | {:<11} | {:>7} | {:>7} | {:>12} | {:>12} | {:>12}",
            s.dataset,
            s.model,
            s.status,
            s.records,
            s.skipped,
            cell(s.mean_error),
            cell(s.std_error),
            cell(s.max_abs_error)
        );
    }
}

/// One-line description of the hedged contract.
pub(crate) fn describe(contract: &OptionContract) -> String {
    format!(
        "{} K={} expiring {}",
        contract.kind(),
        contract.strike(),
        contract.expiry()
    )
}
