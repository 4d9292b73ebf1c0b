//! Backtest configuration management
//!
//! Loads a TOML file (optional), applies environment overrides, then
//! validates. Priority, highest first:
//!
//! 1. Environment variables (`HEDGE_OUTPUT_DIR`, `HEDGE_LOG_LEVEL`, `HEDGE_MC_SEED`)
//! 2. Config file
//! 3. Defaults, which reproduce the standard three-model, three-dataset batch

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use adapter_feeds::FeedLayout;
use pricer_core::types::{Date, DayCountConvention, UnparseableDatePolicy};
use pricer_models::instruments::{InstrumentError, OptionContract};
use pricer_models::lattice::MAX_LATTICE_STEPS;
use pricer_pricing::mc::MonteCarloConfig;
use pricer_pricing::PricingModel;
use serde::Deserialize;
use thiserror::Error;

/// Config file looked for when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "hedge_backtest.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// The TOML did not parse or did not match the schema.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// An environment variable held an unusable value.
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// One or more settings are out of range.
    #[error("Invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Log levels accepted in the config file and `HEDGE_LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including per-record events
    Trace,
    /// Model and pool setup
    Debug,
    /// Run boundaries and summaries
    #[default]
    Info,
    /// Skipped rows and defaulted dates
    Warn,
    /// Failures only
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LogLevel::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// The hedged option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionTerms {
    /// Strike price
    pub strike: f64,
    /// Expiry date, `YYYY-MM-DD`
    pub expiry: Date,
    /// Call (true) or put (false)
    pub is_call: bool,
}

impl Default for OptionTerms {
    fn default() -> Self {
        Self {
            strike: 100.0,
            expiry: Date::from_ymd(2024, 12, 30).expect("literal date is valid"),
            is_call: true,
        }
    }
}

/// One pricing model to backtest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelEntry {
    /// Closed form
    BlackScholes,
    /// Lattice with a step count
    Binomial {
        /// Time steps
        steps: usize,
    },
    /// Monte Carlo
    MonteCarlo {
        /// Simulated paths per price
        paths: usize,
        /// Time steps per path
        steps: usize,
        /// Worker threads; defaults to the machine's parallelism
        #[serde(default)]
        workers: Option<usize>,
        /// Base seed
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl ModelEntry {
    /// File-name slug of the model this entry builds.
    pub fn slug(&self) -> &'static str {
        match self {
            ModelEntry::BlackScholes => "black_scholes",
            ModelEntry::Binomial { .. } => "binomial_tree",
            ModelEntry::MonteCarlo { .. } => "monte_carlo",
        }
    }

    /// Parses a model name as typed on the command line.
    pub fn from_name(
        name: &str,
        steps: usize,
        paths: usize,
        seed: Option<u64>,
    ) -> Result<Self, String> {
        match name.to_lowercase().replace(['-', ' '], "_").as_str() {
            "black_scholes" | "bs" => Ok(ModelEntry::BlackScholes),
            "binomial" | "binomial_tree" => Ok(ModelEntry::Binomial { steps }),
            "monte_carlo" | "mc" => Ok(ModelEntry::MonteCarlo {
                paths,
                steps,
                workers: None,
                seed,
            }),
            _ => Err(format!(
                "Unknown model: {}. Supported: black-scholes, binomial, monte-carlo",
                name
            )),
        }
    }

    /// Monte Carlo engine settings, if this entry is Monte Carlo.
    fn mc_config(&self) -> Option<Result<MonteCarloConfig, String>> {
        match self {
            ModelEntry::MonteCarlo {
                paths,
                steps,
                workers,
                seed,
            } => Some(build_mc_config(*paths, *steps, *workers, *seed)),
            _ => None,
        }
    }

    /// Builds the pricing model.
    pub fn build(&self) -> Result<PricingModel, String> {
        match self {
            ModelEntry::BlackScholes => Ok(PricingModel::black_scholes()),
            ModelEntry::Binomial { steps } => {
                PricingModel::binomial(*steps).map_err(|e| e.to_string())
            }
            ModelEntry::MonteCarlo {
                paths,
                steps,
                workers,
                seed,
            } => {
                let config = build_mc_config(*paths, *steps, *workers, *seed)?;
                PricingModel::monte_carlo(config).map_err(|e| e.to_string())
            }
        }
    }
}

fn build_mc_config(
    paths: usize,
    steps: usize,
    workers: Option<usize>,
    seed: Option<u64>,
) -> Result<MonteCarloConfig, String> {
    let mut builder = MonteCarloConfig::builder().n_paths(paths).n_steps(steps);
    if let Some(workers) = workers {
        builder = builder.workers(workers);
    }
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    builder.build().map_err(|e| e.to_string())
}

/// One quote file to replay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetEntry {
    /// Quote file path
    pub path: PathBuf,
    /// Column units
    #[serde(default, deserialize_with = "deserialize_layout")]
    pub layout: FeedLayout,
    /// Label used in result file names; defaults to the file stem
    #[serde(default)]
    pub name: Option<String>,
}

impl DatasetEntry {
    /// Creates an entry labelled by its file stem.
    pub fn new(path: impl Into<PathBuf>, layout: FeedLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            name: None,
        }
    }

    /// Label used in result file names.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "data".to_string())
        })
    }

    /// Result file name for `model` on this dataset.
    pub fn result_file_name(&self, model: &ModelEntry) -> String {
        format!("result_{}_{}.csv", model.slug(), self.label())
    }
}

fn deserialize_layout<'de, D>(deserializer: D) -> Result<FeedLayout, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    FeedLayout::from_str(&s).map_err(serde::de::Error::custom)
}

/// Backtest configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Hedged option
    pub option: OptionTerms,
    /// Models to run, in order
    pub models: Vec<ModelEntry>,
    /// Quote files to replay, in order
    pub datasets: Vec<DatasetEntry>,
    /// Directory for result files
    pub output_dir: PathBuf,
    /// Log level
    pub log_level: LogLevel,
    /// Optional log file, appended to
    pub log_file: Option<PathBuf>,
    /// Day count for time to expiry
    pub day_count: DayCountConvention,
    /// Handling of quote dates that do not parse
    pub date_policy: UnparseableDatePolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            option: OptionTerms::default(),
            models: vec![
                ModelEntry::BlackScholes,
                ModelEntry::Binomial { steps: 100 },
                ModelEntry::MonteCarlo {
                    paths: 5_000,
                    steps: 252,
                    workers: None,
                    seed: None,
                },
            ],
            datasets: vec![
                DatasetEntry::new("data/market_data_yfinance.csv", FeedLayout::Standard),
                DatasetEntry::new("data/market_data_synthetic.csv", FeedLayout::Standard),
                DatasetEntry::new("data/bloomberg_export.csv", FeedLayout::Percentage),
            ],
            output_dir: PathBuf::from("logs"),
            log_level: LogLevel::Info,
            log_file: Some(PathBuf::from("logs/system.log")),
            day_count: DayCountConvention::default(),
            date_policy: UnparseableDatePolicy::default(),
        }
    }
}

impl BacktestConfig {
    /// Loads configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, or defaults; then applies environment overrides and validates.
    ///
    /// An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies overrides from `lookup`, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("HEDGE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("HEDGE_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(seed) = lookup("HEDGE_MC_SEED") {
            let seed: u64 = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("HEDGE_MC_SEED is not a u64: {}", seed)))?;
            for model in &mut self.models {
                if let ModelEntry::MonteCarlo { seed: slot, .. } = model {
                    *slot = Some(seed);
                }
            }
        }
        Ok(())
    }

    /// Validate the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if let Err(e) = self.contract() {
            problems.push(e.to_string());
        }
        if self.models.is_empty() {
            problems.push("no models configured".to_string());
        }
        for model in &self.models {
            match model {
                ModelEntry::BlackScholes => {}
                ModelEntry::Binomial { steps } => {
                    if *steps == 0 || *steps > MAX_LATTICE_STEPS {
                        problems.push(format!(
                            "binomial steps must be in 1..={}, got {}",
                            MAX_LATTICE_STEPS, steps
                        ));
                    }
                }
                ModelEntry::MonteCarlo { .. } => {
                    if let Some(Err(e)) = model.mc_config() {
                        problems.push(format!("monte carlo: {}", e));
                    }
                }
            }
        }
        if self.datasets.is_empty() {
            problems.push("no datasets configured".to_string());
        }
        let mut labels: Vec<String> = self.datasets.iter().map(DatasetEntry::label).collect();
        labels.sort();
        labels.dedup();
        if labels.len() != self.datasets.len() {
            problems.push("dataset labels must be unique; set `name` to tell files apart".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems))
        }
    }

    /// The option contract described by `[option]`.
    pub fn contract(&self) -> Result<OptionContract, InstrumentError> {
        OptionContract::new(self.option.strike, self.option.expiry, self.option.is_call)
    }
}
