//! CLI argument parsing for schedcmp

use crate::loader::DuplicatePolicy;
use crate::names::DEFAULT_RESULTS_DIR;
use crate::ttest::{CompareConfig, TransformKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "schedcmp")]
#[command(version)]
#[command(
    about = "Paired two-tailed t-test on per-instance total_cost between two scheduling algorithms",
    long_about = None
)]
pub struct Cli {
    /// Directory containing per-algorithm CSVs (used with --algo-a/--algo-b/--batch)
    #[arg(long = "results-dir", value_name = "DIR", default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Algorithm A name (resolved inside --results-dir)
    #[arg(long = "algo-a", value_name = "NAME")]
    pub algo_a: Option<String>,

    /// Algorithm B name (resolved inside --results-dir); the baseline in --batch mode
    #[arg(long = "algo-b", value_name = "NAME")]
    pub algo_b: Option<String>,

    /// Comma-separated algorithms to compare one by one against --algo-b
    #[arg(long = "batch", value_name = "LIST", conflicts_with = "algo_a")]
    pub batch: Option<String>,

    /// Per-instance quantity to test
    #[arg(long = "test", value_enum, default_value = "log-ratio")]
    pub test: TransformKind,

    /// Significance level, strictly between 0 and 1
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// How to treat an instance listed twice in one CSV
    #[arg(long = "duplicate-policy", value_enum, default_value = "min")]
    pub duplicate_policy: DuplicatePolicy,

    /// Write a summary row (comparison, ci_ratio, mean_ratio, p_value) to this CSV file
    #[arg(long = "stats-csv", value_name = "PATH")]
    pub stats_csv: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also summarize the paired differences cost_a - cost_b
    #[arg(long = "diff-summary")]
    pub diff_summary: bool,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Two CSV paths compared directly (overrides --results-dir/--algo-*)
    #[arg(value_name = "CSV_PATHS")]
    pub csv_paths: Vec<PathBuf>,
}

impl Cli {
    /// Comparison configuration selected by the flags
    pub fn config(&self) -> CompareConfig {
        CompareConfig::default()
            .with_significance_level(self.alpha)
            .with_transform(self.test)
            .with_duplicate_policy(self.duplicate_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["schedcmp", "--algo-a", "ff", "--algo-b", "bf"]);
        assert_eq!(cli.results_dir, PathBuf::from("eval_results"));
        assert_eq!(cli.alpha, 0.05);
        assert_eq!(cli.test, TransformKind::LogRatio);
        assert_eq!(cli.duplicate_policy, DuplicatePolicy::Min);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.stats_csv.is_none());
        assert!(cli.csv_paths.is_empty());
        assert!(!cli.diff_summary);
    }

    #[test]
    fn test_cli_positional_paths() {
        let cli = Cli::parse_from(["schedcmp", "r/eval_a.csv", "r/eval_b.csv"]);
        assert_eq!(cli.csv_paths.len(), 2);
        assert!(cli.algo_a.is_none());
    }

    #[test]
    fn test_cli_raw_ratio_and_alpha() {
        let cli = Cli::parse_from([
            "schedcmp",
            "--test",
            "raw-ratio",
            "--alpha",
            "0.01",
            "--duplicate-policy",
            "error",
            "a.csv",
            "b.csv",
        ]);
        let config = cli.config();
        assert_eq!(config.transform, TransformKind::RawRatio);
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Error);
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["schedcmp", "--format", "json", "a.csv", "b.csv"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_batch_conflicts_with_algo_a() {
        let result = Cli::try_parse_from([
            "schedcmp", "--batch", "ff,bf", "--algo-a", "nf", "--algo-b", "lpt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_test() {
        assert!(Cli::try_parse_from(["schedcmp", "--test", "welch", "a.csv", "b.csv"]).is_err());
    }
}
