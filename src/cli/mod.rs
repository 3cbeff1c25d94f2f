//! Command-line parsing for the stock dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! training and data code. Mapping into pipeline configs happens in `app`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sdash", version, about = "Stock dashboard with SVR close-price forecasts")]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG overrides).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train on the last 60 days of closes and predict the next days.
    Forecast(ForecastArgs),
    /// Chart Close and Open over a date range.
    Prices(HistoryArgs),
    /// Chart the EWM (span 20) trend indicator of Close.
    Indicator(HistoryArgs),
    /// Print company metadata.
    Info(InfoArgs),
    /// Launch the interactive dashboard.
    Dash(DashArgs),
}

/// Where to get prices from.
#[derive(Debug, Args, Clone, Copy)]
pub struct SourceArgs {
    /// Use a seeded synthetic random walk instead of the market-data API.
    #[arg(long)]
    pub synthetic: bool,

    /// Seed for `--synthetic` histories.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    /// Stock ticker, e.g. AAPL.
    #[arg(short = 't', long)]
    pub ticker: String,

    /// Number of days including today (2 predicts one day ahead).
    #[arg(short = 'n', long = "n-days")]
    pub n_days: usize,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Cross-validation folds.
    #[arg(long, default_value_t = crate::domain::DEFAULT_FOLDS)]
    pub folds: usize,

    /// Shuffle samples into folds with this seed (contiguous folds otherwise).
    #[arg(long, value_name = "SEED")]
    pub shuffle_folds: Option<u64>,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export predicted points to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the forecast (points + selected hyperparameters) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct HistoryArgs {
    #[arg(short = 't', long)]
    pub ticker: String,

    /// First date (YYYY-MM-DD). Full history when omitted.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date, exclusive (YYYY-MM-DD). Up to today when omitted.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, default_value_t = 80)]
    pub width: usize,

    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct InfoArgs {
    #[arg(short = 't', long)]
    pub ticker: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Ticker to load on start.
    #[arg(short = 't', long, default_value = "AAPL")]
    pub ticker: String,

    /// Initial forecast length in days (including today).
    #[arg(short = 'n', long = "n-days", default_value_t = 10)]
    pub n_days: usize,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_forecast_flags() {
        let cli = Cli::parse_from([
            "sdash",
            "-v",
            "forecast",
            "-t",
            "msft",
            "-n",
            "10",
            "--synthetic",
            "--shuffle-folds",
            "7",
            "--export",
            "out.csv",
        ]);
        assert!(cli.verbose);
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.ticker, "msft");
        assert_eq!(args.n_days, 10);
        assert!(args.source.synthetic);
        assert_eq!(args.shuffle_folds, Some(7));
        assert_eq!(args.folds, 5);
        assert_eq!((args.width, args.height), (80, 20));
        assert_eq!(args.export, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn parses_history_dates() {
        let cli = Cli::parse_from(["sdash", "prices", "-t", "AAPL", "--start", "2026-01-05", "--end", "2026-02-01"]);
        let Command::Prices(args) = cli.command else {
            panic!("expected prices");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert!(!args.source.synthetic);
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["sdash", "indicator", "-t", "AAPL", "--start", "05/01/2026"]).is_err());
    }
}
