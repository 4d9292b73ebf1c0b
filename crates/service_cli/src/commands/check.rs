//! Check command implementation
//!
//! Validates the configuration without running a backtest: builds every
//! model and scans every dataset for unreadable rows.

use adapter_feeds::QuoteFeed;
use tracing::{info, warn};

use super::run::describe;
use crate::config::{BacktestConfig, DatasetEntry};
use crate::{CliError, Result};

/// Row counts of one dataset scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetScan {
    /// Rows that parse as quotes
    pub quotes: usize,
    /// Rows that do not
    pub malformed: usize,
    /// Quotes whose date did not parse
    pub undated: usize,
}

/// Run the check command
pub fn run(config: &BacktestConfig) -> Result<()> {
    info!("Checking configuration...");
    let mut problems = 0;

    let contract = config
        .contract()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    println!("Option:      {}", describe(&contract));
    println!("Day count:   {}", config.day_count);
    println!("Bad dates:   {}", config.date_policy);
    println!("Output dir:  {}", config.output_dir.display());

    for entry in &config.models {
        match entry.build() {
            Ok(model) => println!("  [ok]   model {}", model.slug()),
            Err(e) => {
                problems += 1;
                println!("  [fail] model {}: {}", entry.slug(), e);
            }
        }
    }

    for dataset in &config.datasets {
        match scan(dataset) {
            Ok(scan) => {
                println!(
                    "  [ok]   {} ({}): {} quotes, {} malformed, {} undated",
                    dataset.path.display(),
                    dataset.layout,
                    scan.quotes,
                    scan.malformed,
                    scan.undated
                );
            }
            Err(e) => {
                problems += 1;
                println!("  [fail] {}: {}", dataset.path.display(), e);
            }
        }
    }

    if problems == 0 {
        info!("Configuration OK");
        Ok(())
    } else {
        warn!(problems, "Configuration has problems");
        Err(CliError::InvalidArgument(format!(
            "{} problem(s) found",
            problems
        )))
    }
}

/// Reads a dataset end to end and counts its rows.
pub fn scan(dataset: &DatasetEntry) -> Result<DatasetScan> {
    if !dataset.path.exists() {
        return Err(CliError::FileNotFound(dataset.path.display().to_string()));
    }
    let mut scan = DatasetScan::default();
    for (_, row) in QuoteFeed::open(&dataset.path, dataset.layout)? {
        match row {
            Ok(quote) => {
                scan.quotes += 1;
                if quote.date.as_date().is_none() {
                    scan.undated += 1;
                }
            }
            Err(_) => scan.malformed += 1,
        }
    }
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_feeds::FeedLayout;

    #[test]
    fn test_scan_counts_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.csv");
        std::fs::write(
            &path,
            "Date,Spot,Rate,Vol\n2024-06-03,100,0.05,0.2\nlater,101,0.05,0.2\n2024-06-05,abc,0.05,0.2\n",
        )
        .unwrap();

        let scan = scan(&DatasetEntry::new(&path, FeedLayout::Standard)).unwrap();
        assert_eq!(
            scan,
            DatasetScan {
                quotes: 2,
                malformed: 1,
                undated: 1
            }
        );
    }

    #[test]
    fn test_scan_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let entry = DatasetEntry::new(dir.path().join("absent.csv"), FeedLayout::Standard);
        assert!(matches!(scan(&entry), Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_check_fails_on_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = BacktestConfig {
            datasets: vec![DatasetEntry::new(dir.path().join("absent.csv"), FeedLayout::Standard)],
            ..BacktestConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
