//! CLI argument parsing for Velograph

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "velograph")]
#[command(version)]
#[command(about = "Statistical analysis of speed-test history files", long_about = None)]
pub struct Cli {
    /// Path to the speed-test history JSON file
    #[arg(value_name = "HISTORY")]
    pub input: PathBuf,

    /// Keep only tests from the last N days
    #[arg(short = 'd', long = "days", value_name = "DAYS")]
    pub days: Option<i64>,

    /// Keep only tests against this server id
    #[arg(short = 's', long = "server", value_name = "ID")]
    pub server: Option<i64>,

    /// Keep only tests with at least this download speed (Mbps)
    #[arg(long = "min-download", value_name = "MBPS")]
    pub min_download: Option<f64>,

    /// Keep only tests with at least this upload speed (Mbps)
    #[arg(long = "min-upload", value_name = "MBPS")]
    pub min_upload: Option<f64>,

    /// Rolling window size in tests (default: 10, minimum 2)
    #[arg(short = 'w', long = "window-size", value_name = "TESTS", default_value = "10")]
    pub window_size: usize,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_input_path() {
        let cli = Cli::parse_from(["velograph", "history.json"]);
        assert_eq!(cli.input, PathBuf::from("history.json"));
        assert!(cli.days.is_none());
        assert!(cli.server.is_none());
    }

    #[test]
    fn test_cli_default_window_and_format() {
        let cli = Cli::parse_from(["velograph", "history.json"]);
        assert_eq!(cli.window_size, 10);
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_filter_flags() {
        let cli = Cli::parse_from([
            "velograph",
            "history.json",
            "--days",
            "30",
            "--server",
            "4404",
            "--min-download",
            "100.5",
            "--min-upload",
            "50",
        ]);
        assert_eq!(cli.days, Some(30));
        assert_eq!(cli.server, Some(4404));
        assert_eq!(cli.min_download, Some(100.5));
        assert_eq!(cli.min_upload, Some(50.0));
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["velograph", "history.json", "--format", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["velograph", "history.json", "-d", "7", "-s", "1", "-w", "20", "-v"]);
        assert_eq!(cli.days, Some(7));
        assert_eq!(cli.server, Some(1));
        assert_eq!(cli.window_size, 20);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["velograph"]).is_err());
    }
}
