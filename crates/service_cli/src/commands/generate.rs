//! Generate command implementation
//!
//! Writes seeded synthetic quote files. `all` reproduces the default
//! batch inputs: two standard-layout walks and one percentage-layout export.

use std::path::PathBuf;

use adapter_feeds::SyntheticFeed;
use pricer_core::types::Date;
use tracing::info;

use crate::{CliError, Result};

/// What to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// `walk`, `export` or `all`
    pub kind: String,
    /// Directory the files go into
    pub out_dir: PathBuf,
    /// File name for a single `walk` or `export`
    pub name: Option<String>,
    /// First date; each kind has its own default
    pub start: Option<String>,
    /// Row count override
    pub days: Option<usize>,
    /// Initial spot of a walk
    pub spot: f64,
    /// Decimal volatility of a walk
    pub volatility: f64,
    /// Generator seed override
    pub seed: Option<u64>,
    /// Skip weekend dates
    pub weekdays_only: bool,
}

/// Run the generate command
pub fn run(request: &GenerateRequest) -> Result<()> {
    let written = generate(request)?;
    for path in &written {
        println!("{}", path.display());
    }
    info!(files = written.len(), "Generation complete");
    Ok(())
}

/// Writes the requested files and returns their paths.
pub fn generate(request: &GenerateRequest) -> Result<Vec<PathBuf>> {
    let start = request.start.as_deref().map(Date::parse).transpose()?;
    let jobs: Vec<(String, SyntheticFeed)> = match request.kind.as_str() {
        "walk" => vec![(
            file_name(request, "market_data_synthetic.csv"),
            SyntheticFeed::walk(walk_start(start)?, request.spot, request.volatility),
        )],
        "export" => vec![(
            file_name(request, "bloomberg_export.csv"),
            SyntheticFeed::terminal_export(export_start(start)?),
        )],
        "all" => {
            if request.name.is_some() {
                return Err(CliError::InvalidArgument(
                    "--name applies to a single walk or export".to_string(),
                ));
            }
            vec![
                (
                    "market_data_yfinance.csv".to_string(),
                    SyntheticFeed::walk(walk_start(start)?, 400.0, 0.15),
                ),
                (
                    "market_data_synthetic.csv".to_string(),
                    SyntheticFeed::walk(walk_start(start)?, 100.0, 0.2),
                ),
                (
                    "bloomberg_export.csv".to_string(),
                    SyntheticFeed::terminal_export(export_start(start)?),
                ),
            ]
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown kind: {}. Supported: walk, export, all",
                other
            )))
        }
    };

    let mut written = Vec::with_capacity(jobs.len());
    for (name, feed) in jobs {
        let feed = customise(feed, request);
        let path = request.out_dir.join(name);
        feed.write_path(&path)?;
        written.push(path);
    }
    Ok(written)
}

fn customise(mut feed: SyntheticFeed, request: &GenerateRequest) -> SyntheticFeed {
    if let Some(days) = request.days {
        feed = feed.with_days(days);
    }
    if let Some(seed) = request.seed {
        feed = feed.with_seed(seed);
    }
    feed.weekdays_only(request.weekdays_only)
}

fn file_name(request: &GenerateRequest, default: &str) -> String {
    request.name.clone().unwrap_or_else(|| default.to_string())
}

fn walk_start(start: Option<Date>) -> Result<Date> {
    match start {
        Some(date) => Ok(date),
        None => Ok(Date::from_ymd(2023, 1, 1)?),
    }
}

fn export_start(start: Option<Date>) -> Result<Date> {
    match start {
        Some(date) => Ok(date),
        None => Ok(Date::from_ymd(2023, 6, 1)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_feeds::{FeedLayout, QuoteFeed};
    use std::path::Path;

    fn request(kind: &str, out_dir: &Path) -> GenerateRequest {
        GenerateRequest {
            kind: kind.to_string(),
            out_dir: out_dir.to_path_buf(),
            name: None,
            start: None,
            days: None,
            spot: 100.0,
            volatility: 0.2,
            seed: None,
            weekdays_only: false,
        }
    }

    #[test]
    fn test_all_writes_default_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate(&request("all", dir.path())).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.is_file()));
        assert!(dir.path().join("market_data_yfinance.csv").is_file());

        let export: Vec<_> = QuoteFeed::open(&written[2], FeedLayout::Percentage)
            .unwrap()
            .map(|(_, row)| row.unwrap())
            .collect();
        assert_eq!(export.len(), 100);
        assert_eq!(export[0].date.to_string(), "2023-06-01");
        assert!((export[0].rate - 0.05).abs() < 1e-12);
        assert!((export[0].volatility - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_walk_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request("walk", dir.path());
        req.name = Some("short.csv".to_string());
        req.start = Some("2024-01-05".to_string());
        req.days = Some(4);
        req.spot = 50.0;
        req.weekdays_only = true;

        let written = generate(&req).unwrap();
        let quotes: Vec<_> = QuoteFeed::open(&written[0], FeedLayout::Standard)
            .unwrap()
            .map(|(_, row)| row.unwrap())
            .collect();
        let dates: Vec<String> = quotes.iter().map(|q| q.date.to_string()).collect();
        // 2024-01-05 is a Friday
        assert_eq!(dates, ["2024-01-05", "2024-01-08", "2024-01-09", "2024-01-10"]);
        assert_eq!(quotes[0].spot, 50.0);
    }

    #[test]
    fn test_same_seed_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request("walk", dir.path());
        req.name = Some("a.csv".to_string());
        generate(&req).unwrap();
        req.name = Some("b.csv".to_string());
        generate(&req).unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("a.csv")).unwrap(),
            std::fs::read(dir.path().join("b.csv")).unwrap()
        );
    }

    #[test]
    fn test_rejects_unknown_kind_and_bad_start() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            generate(&request("heston", dir.path())),
            Err(CliError::InvalidArgument(_))
        ));
        let mut req = request("walk", dir.path());
        req.start = Some("soon".to_string());
        assert!(matches!(generate(&req), Err(CliError::Date(_))));
    }
}
