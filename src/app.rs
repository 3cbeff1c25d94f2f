//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches price history
//! - trains and runs the forecast
//! - prints reports/charts and writes optional exports

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::cli::{Command, DashArgs, ForecastArgs, HistoryArgs, InfoArgs, SourceArgs};
use crate::domain::{DEFAULT_TEST_FRACTION, DataSource, ForecastConfig, ForecastRequest, HistoryConfig, normalize_ticker};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sdash` binary.
pub fn run() -> Result<(), AppError> {
    // `sdash` and `sdash -t MSFT` behave like `sdash dash ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The dashboard owns the terminal; stderr logs would tear the screen.
    if !matches!(cli.command, Command::Dash(_)) {
        crate::logging::init(cli.verbose);
    }

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Prices(args) => handle_prices(args),
        Command::Indicator(args) => handle_indicator(args),
        Command::Info(args) => handle_info(args),
        Command::Dash(args) => handle_dash(args),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args)?;
    let run = pipeline::run_forecast(&config, today())?;

    println!("{}", crate::report::format_forecast_summary(&run));
    println!("{}", crate::report::format_forecast_table(&run.points));
    if config.plot {
        println!(
            "{}",
            crate::report::forecast_chart(&run, config.plot_width, config.plot_height)
        );
    }

    if let Some(path) = &config.export_csv {
        crate::io::write_forecast_csv(path, &run.points)?;
    }
    if let Some(path) = &config.export_json {
        let title = crate::report::forecast_title(run.request.n_days);
        crate::io::write_forecast_json(path, &run.to_file(&title))?;
    }

    Ok(())
}

fn handle_prices(args: HistoryArgs) -> Result<(), AppError> {
    let config = history_config_from_args(&args)?;
    let history = pipeline::fetch_history(&config, today())?;

    println!("{}", crate::report::format_history_summary(&history));
    println!(
        "{}",
        crate::report::price_chart(&history, config.plot_width, config.plot_height)
    );
    Ok(())
}

fn handle_indicator(args: HistoryArgs) -> Result<(), AppError> {
    let config = history_config_from_args(&args)?;
    let history = pipeline::fetch_history(&config, today())?;
    let ewm = pipeline::indicator_series(&history)?;

    println!("{}", crate::report::format_history_summary(&history));
    if let Some(last) = ewm.last() {
        println!("{}: {last:.2}\n", crate::report::INDICATOR_LABEL);
    }
    println!(
        "{}",
        crate::report::indicator_chart(&history, &ewm, config.plot_width, config.plot_height)
    );
    Ok(())
}

fn handle_info(args: InfoArgs) -> Result<(), AppError> {
    let ticker = normalize_ticker(&args.ticker)?;
    let source = data_source(&args.source);
    let history = pipeline::with_description(pipeline::fetch_forecast_history(&ticker, source, today())?, source)?;
    println!("{}", crate::report::format_company_info(&history.profile));
    Ok(())
}

fn handle_dash(args: DashArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

pub fn data_source(args: &SourceArgs) -> DataSource {
    if args.synthetic {
        DataSource::Synthetic { seed: args.seed }
    } else {
        DataSource::Yahoo
    }
}

pub fn forecast_config_from_args(args: &ForecastArgs) -> Result<ForecastConfig, AppError> {
    Ok(ForecastConfig {
        request: ForecastRequest::new(args.ticker.as_str(), args.n_days)?,
        source: data_source(&args.source),
        test_fraction: DEFAULT_TEST_FRACTION,
        folds: args.folds,
        fold_seed: args.shuffle_folds,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

pub fn history_config_from_args(args: &HistoryArgs) -> Result<HistoryConfig, AppError> {
    Ok(HistoryConfig {
        ticker: normalize_ticker(&args.ticker)?,
        source: data_source(&args.source),
        start: args.start,
        end: args.end,
        plot_width: args.width,
        plot_height: args.height,
    })
}

/// Rewrite argv so `sdash` defaults to `sdash dash`.
///
/// Rules:
/// - `sdash`                      -> `sdash dash`
/// - `sdash -t MSFT ...`          -> `sdash dash -t MSFT ...`
/// - `sdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dash".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "forecast" | "prices" | "indicator" | "info" | "dash");
    if is_subcommand {
        return argv;
    }

    // `-v` may precede a subcommand; otherwise flags belong to the dashboard.
    let has_subcommand = argv[1..]
        .iter()
        .any(|a| matches!(a.as_str(), "forecast" | "prices" | "indicator" | "info" | "dash"));
    if arg1.starts_with('-') && !has_subcommand {
        argv.insert(1, "dash".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_dashboard() {
        assert_eq!(rewrite_args(argv(&["sdash"])), argv(&["sdash", "dash"]));
        assert_eq!(
            rewrite_args(argv(&["sdash", "-t", "MSFT"])),
            argv(&["sdash", "dash", "-t", "MSFT"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["sdash", "--help"]),
            argv(&["sdash", "forecast", "-t", "A", "-n", "2"]),
            argv(&["sdash", "-v", "info", "-t", "A"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn forecast_config_validates_request() {
        let cli = crate::cli::Cli::parse_from(["sdash", "forecast", "-t", " aapl ", "-n", "1"]);
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(forecast_config_from_args(&args).unwrap_err().exit_code(), 2);

        let args = ForecastArgs { n_days: 5, ..args };
        let config = forecast_config_from_args(&args).unwrap();
        assert_eq!(config.request.ticker, "AAPL");
        assert_eq!(config.request.horizon(), 4);
        assert_eq!(config.source, DataSource::Yahoo);
        assert!(config.plot);
    }
}
