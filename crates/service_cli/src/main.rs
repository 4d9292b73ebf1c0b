//! Hedge Backtest CLI
//!
//! Replays market-quote files through option pricing models and writes a
//! delta-hedge ledger per model and dataset.
//!
//! # Commands
//!
//! - `hedge-backtest run` - Backtest every configured model on every dataset
//! - `hedge-backtest price` - Price the configured option once
//! - `hedge-backtest generate` - Write seeded synthetic quote files
//! - `hedge-backtest summarize` - Hedging-error statistics of result files
//! - `hedge-backtest check` - Validate configuration and datasets
//!
//! Settings come from `hedge_backtest.toml` (or `--config`), overridden by
//! `HEDGE_*` environment variables. `RUST_LOG` overrides the log level.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::generate::GenerateRequest;
use commands::price::PriceRequest;
use config::{BacktestConfig, ModelEntry};

/// Delta-hedge backtester for European options
#[derive(Parser)]
#[command(name = "hedge-backtest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML); `hedge_backtest.toml` is used if present
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest every configured model on every configured dataset
    Run {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Price the configured option once
    Price {
        /// Spot price
        #[arg(long)]
        spot: f64,

        /// Risk-free rate, decimal
        #[arg(long)]
        rate: f64,

        /// Volatility, decimal
        #[arg(long)]
        vol: f64,

        /// Years to expiry
        #[arg(long, conflicts_with = "date")]
        years: Option<f64>,

        /// Valuation date (YYYY-MM-DD), measured against the configured expiry
        #[arg(short, long)]
        date: Option<String>,

        /// Strike; defaults to the configured strike
        #[arg(short = 'k', long)]
        strike: Option<f64>,

        /// Price a put
        #[arg(long)]
        put: bool,

        /// Model (black-scholes, binomial, monte-carlo)
        #[arg(short, long, default_value = "black-scholes")]
        model: String,

        /// Binomial or Monte Carlo time steps
        #[arg(long, default_value = "100")]
        steps: usize,

        /// Number of Monte Carlo paths
        #[arg(short = 'n', long, default_value = "10000")]
        num_paths: usize,

        /// Monte Carlo seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Write seeded synthetic quote files
    Generate {
        /// What to write (walk, export, all)
        #[arg(short, long, default_value = "all")]
        kind: String,

        /// Output directory
        #[arg(short, long, default_value = "data")]
        out_dir: PathBuf,

        /// File name for a single walk or export
        #[arg(long)]
        name: Option<String>,

        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Number of rows
        #[arg(long)]
        days: Option<usize>,

        /// Initial spot of a walk
        #[arg(long, default_value = "100.0")]
        spot: f64,

        /// Annual volatility of a walk, decimal
        #[arg(long, default_value = "0.2")]
        vol: f64,

        /// Generator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Skip weekend dates
        #[arg(long)]
        weekdays: bool,
    },

    /// Hedging-error statistics of result files
    Summarize {
        /// Result files; defaults to every result_*.csv in the output directory
        files: Vec<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check configuration and datasets without running
    Check,
}

fn init_tracing(level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = BacktestConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    init_tracing(level, config.log_file.as_deref())?;

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run { format } => commands::run::run(&config, &format)?,
        Commands::Price {
            spot,
            rate,
            vol,
            years,
            date,
            strike,
            put,
            model,
            steps,
            num_paths,
            seed,
            format,
        } => {
            let model = ModelEntry::from_name(&model, steps, num_paths, seed)
                .map_err(CliError::InvalidArgument)?;
            let request = PriceRequest {
                spot,
                rate,
                volatility: vol,
                strike,
                put,
                years,
                date,
                model,
            };
            commands::price::run(&config, &request, &format)?
        }
        Commands::Generate {
            kind,
            out_dir,
            name,
            start,
            days,
            spot,
            vol,
            seed,
            weekdays,
        } => commands::generate::run(&GenerateRequest {
            kind,
            out_dir,
            name,
            start,
            days,
            spot,
            volatility: vol,
            seed,
            weekdays_only: weekdays,
        })?,
        Commands::Summarize { files, format } => {
            commands::summarize::run(&files, &config.output_dir, &format)?
        }
        Commands::Check => commands::check::run(&config)?,
    }
    Ok(())
}
