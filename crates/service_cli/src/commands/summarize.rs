//! Summarize command implementation
//!
//! Reads result files back and reports hedging-error statistics per file.

use std::path::{Path, PathBuf};

use adapter_feeds::read_hedging_errors;
use pricer_risk::HedgingErrorSummary;
use serde::Serialize;
use tracing::{info, warn};

use super::OutputFormat;
use crate::Result;

/// Statistics of one result file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    /// File name with the `result_` prefix and `.csv` suffix removed
    pub name: String,
    /// Path read
    pub path: PathBuf,
    /// Hedging-error statistics
    pub errors: HedgingErrorSummary,
}

/// Run the summarize command
///
/// With no `files`, every `result_*.csv` in `output_dir` is read.
pub fn run(files: &[PathBuf], output_dir: &Path, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let files = if files.is_empty() {
        discover(output_dir)?
    } else {
        files.to_vec()
    };
    let summaries = summarize(&files);
    info!(files = files.len(), summarised = summaries.len(), "Summary complete");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Table => {
            println!(
                "{:<30} | {:<15} | {:<15} | {:<15}",
                "Model", "Mean Error ($)", "Error StdDev", "Max Deviation ($)"
            );
            println!("{}", "-".repeat(85));
            for s in &summaries {
                println!(
                    "{:<30} | {:>14.4} | {:>14.4} | {:>14.4}",
                    s.name, s.errors.mean, s.errors.std_dev, s.errors.max_abs
                );
            }
        }
    }
    Ok(())
}

/// Result files in `dir`, sorted by name. A missing directory has none.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Output directory not found");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_result = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("result_") && n.ends_with(".csv"));
        if is_result && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Summarises each readable file; unreadable or empty files are logged and left out.
pub fn summarize(files: &[PathBuf]) -> Vec<FileSummary> {
    files
        .iter()
        .filter_map(|path| match read_hedging_errors(path) {
            Ok(errors) if errors.is_empty() => {
                warn!(path = %path.display(), "No hedging errors in file");
                None
            }
            Ok(errors) => Some(FileSummary {
                name: display_name(path),
                path: path.clone(),
                errors: HedgingErrorSummary::from_errors(&errors),
            }),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping unreadable result file");
                None
            }
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_prefix("result_").unwrap_or(&name);
    name.strip_suffix(".csv").unwrap_or(name).to_string()
}
