//! Shared request pipelines used by both the CLI and the dashboard.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch history -> day-index dataset -> temporal split -> select + fit -> predict
//!
//! The front-ends then focus on presentation (printing vs widgets).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::info;

use crate::data::{YahooClient, generate_history};
use crate::domain::{
    DataSource, Dataset, FORECAST_WINDOW, ForecastConfig, ForecastPoint, ForecastRun, HistoryConfig, INDICATOR_SPAN,
    PriceHistory, future_dates, future_day_indices,
};
use crate::error::AppError;
use crate::fit::{HyperparameterGrid, TrainerConfig, mean_absolute_error, select_and_fit_with};
use crate::math::ewm_mean;
use crate::models::SvrOptions;

/// Bars generated for a synthetic forecast window.
pub const SYNTHETIC_FORECAST_BARS: usize = 60;
/// Bars generated for a synthetic history view without a start date.
pub const SYNTHETIC_HISTORY_BARS: usize = 250;

/// Fetch the forecast window and run the full forecast.
pub fn run_forecast(config: &ForecastConfig, today: NaiveDate) -> Result<ForecastRun, AppError> {
    let history = fetch_forecast_history(&config.request.ticker, config.source, today)?;
    run_forecast_with_history(config, history, today)
}

/// Run the forecast on an already fetched history.
///
/// Day indices are positions in `history.bars`; future indices continue from
/// the last bar of the whole window (not just the training prefix).
pub fn run_forecast_with_history(
    config: &ForecastConfig,
    history: PriceHistory,
    today: NaiveDate,
) -> Result<ForecastRun, AppError> {
    let dataset = Dataset::from_closes(&history.closes());
    let Some(last_day_index) = dataset.last_day_index() else {
        return Err(AppError::new(4, format!("No price data for {}.", history.ticker)));
    };

    let split = dataset.temporal_split(config.test_fraction)?;
    let trainer = TrainerConfig {
        grid: HyperparameterGrid::default(),
        folds: config.folds,
        fold_seed: config.fold_seed,
        solver: SvrOptions::default(),
    };
    let model = select_and_fit_with(&split.train, &trainer)?;

    let test_days: Vec<usize> = split.test.iter().map(|s| s.day_index).collect();
    let test_closes: Vec<f64> = split.test.iter().map(|s| s.close).collect();
    let holdout_mae = model
        .predict(&test_days)
        .ok()
        .and_then(|pred| mean_absolute_error(&test_closes, &pred));

    let n_days = config.request.n_days;
    let day_indices = future_day_indices(last_day_index, n_days)?;
    let predicted = model.predict(&day_indices)?;
    let points: Vec<ForecastPoint> = future_dates(today, n_days)?
        .into_iter()
        .zip(day_indices)
        .zip(predicted)
        .map(|((date, day_index), predicted_close)| ForecastPoint {
            date,
            day_index,
            predicted_close,
        })
        .collect();

    info!(
        ticker = %config.request.ticker,
        n_days,
        points = points.len(),
        cv_mae = model.cv_mae(),
        "forecast complete"
    );

    Ok(ForecastRun {
        request: config.request.clone(),
        generated_on: today,
        params: model.params(),
        cv_mae: model.cv_mae(),
        holdout_mae,
        n_train: split.train.len(),
        n_test: split.test.len(),
        last_day_index,
        points,
        history,
    })
}

/// The recent window the forecast trains on.
pub fn fetch_forecast_history(ticker: &str, source: DataSource, today: NaiveDate) -> Result<PriceHistory, AppError> {
    match source {
        DataSource::Yahoo => YahooClient::from_env()?.fetch_recent(ticker, FORECAST_WINDOW),
        DataSource::Synthetic { seed } => generate_history(ticker, SYNTHETIC_FORECAST_BARS, seed, today),
    }
}

/// Add the company description to a fetched history. Synthetic histories
/// carry their own; a failed Yahoo profile lookup leaves it empty.
pub fn with_description(mut history: PriceHistory, source: DataSource) -> Result<PriceHistory, AppError> {
    if source == DataSource::Yahoo && history.profile.description.is_none() {
        YahooClient::from_env()?.attach_description(&mut history);
    }
    Ok(history)
}

/// History for the price / indicator / info views.
pub fn fetch_history(config: &HistoryConfig, today: NaiveDate) -> Result<PriceHistory, AppError> {
    if let (Some(start), Some(end)) = (config.start, config.end) {
        if start >= end {
            return Err(AppError::new(2, format!("Start date {start} must be before end date {end}.")));
        }
    }

    match config.source {
        DataSource::Yahoo => YahooClient::from_env()?.fetch_range(&config.ticker, config.start, config.end),
        DataSource::Synthetic { seed } => {
            // End is exclusive, like the HTTP range.
            let last = match config.end {
                Some(end) => end - Duration::days(1),
                None => today,
            };
            let bars = match config.start {
                Some(start) => weekdays_between(start, last),
                None => SYNTHETIC_HISTORY_BARS,
            };
            if bars == 0 {
                return Err(AppError::new(4, format!("No trading days in the requested range for {}.", config.ticker)));
            }
            generate_history(&config.ticker, bars, seed, last)
        }
    }
}

/// EWM (span 20) of the close series, aligned with `history.bars`.
pub fn indicator_series(history: &PriceHistory) -> Result<Vec<f64>, AppError> {
    Ok(ewm_mean(&history.closes(), INDICATOR_SPAN)?)
}

fn weekdays_between(start: NaiveDate, last: NaiveDate) -> usize {
    start
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_FOLDS, DEFAULT_TEST_FRACTION, ForecastRequest};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history_config(start: Option<NaiveDate>, end: Option<NaiveDate>) -> HistoryConfig {
        HistoryConfig {
            ticker: "ACME".into(),
            source: DataSource::Synthetic { seed: 3 },
            start,
            end,
            plot_width: 80,
            plot_height: 20,
        }
    }

    #[test]
    fn weekday_count_skips_weekends() {
        // 2026-10-12 (Mon) .. 2026-10-23 (Fri): two full weeks.
        assert_eq!(weekdays_between(ymd(2026, 10, 12), ymd(2026, 10, 23)), 10);
        assert_eq!(weekdays_between(ymd(2026, 10, 17), ymd(2026, 10, 18)), 0);
    }

    #[test]
    fn synthetic_history_respects_range() {
        let config = history_config(Some(ymd(2026, 10, 12)), Some(ymd(2026, 10, 24)));
        let history = fetch_history(&config, ymd(2026, 10, 19)).unwrap();
        assert_eq!(history.bars.len(), 10);
        assert_eq!(history.bars.first().unwrap().date, ymd(2026, 10, 12));
        assert_eq!(history.bars.last().unwrap().date, ymd(2026, 10, 23));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = history_config(Some(ymd(2026, 10, 12)), Some(ymd(2026, 10, 1)));
        assert_eq!(fetch_history(&config, ymd(2026, 10, 19)).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn synthetic_history_keeps_its_description() {
        let history = generate_history("ACME", 10, 2, ymd(2026, 10, 16)).unwrap();
        let expected = history.profile.description.clone();
        assert!(expected.is_some());
        let history = with_description(history, DataSource::Synthetic { seed: 2 }).unwrap();
        assert_eq!(history.profile.description, expected);
    }

    #[test]
    fn indicator_aligns_with_bars() {
        let history = fetch_history(&history_config(None, None), ymd(2026, 10, 19)).unwrap();
        let ewm = indicator_series(&history).unwrap();
        assert_eq!(ewm.len(), history.bars.len());
        assert_eq!(ewm[0], history.bars[0].close);
    }

    #[test]
    fn empty_history_is_a_data_error() {
        let config = ForecastConfig {
            request: ForecastRequest::new("ACME", 3).unwrap(),
            source: DataSource::Synthetic { seed: 1 },
            test_fraction: DEFAULT_TEST_FRACTION,
            folds: DEFAULT_FOLDS,
            fold_seed: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        };
        let history = PriceHistory {
            ticker: "ACME".into(),
            profile: Default::default(),
            bars: Vec::new(),
        };
        let err = run_forecast_with_history(&config, history, ymd(2026, 10, 19)).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
