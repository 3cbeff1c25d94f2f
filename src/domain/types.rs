//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during training
//! - exported to JSON/CSV
//! - printed by the report layer

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Number of cross-validation folds used by the grid search.
pub const DEFAULT_FOLDS: usize = 5;

/// Fraction of the dataset held out (at the end) as the test suffix.
pub const DEFAULT_TEST_FRACTION: f64 = 0.1;

/// History window the forecast is trained on (Yahoo range syntax).
pub const FORECAST_WINDOW: &str = "60d";

/// Span of the exponentially weighted trend indicator.
pub const INDICATOR_SPAN: usize = 20;

/// One training observation: a trading day's position in the window and its close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub day_index: usize,
    pub close: f64,
}

/// An ordered sequence of samples (oldest first).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

/// Output of [`Dataset::temporal_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSplit {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl Dataset {
    /// Assign day indices `0..n` to date-sorted closing prices.
    pub fn from_closes(closes: &[f64]) -> Self {
        let samples = closes
            .iter()
            .enumerate()
            .map(|(day_index, &close)| Sample { day_index, close })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Last day index in the dataset (train and test included).
    pub fn last_day_index(&self) -> Option<usize> {
        self.samples.last().map(|s| s.day_index)
    }

    /// Split into a training prefix and a test suffix without shuffling.
    ///
    /// The test suffix holds `ceil(test_fraction * n)` samples, so it is never
    /// empty for a non-empty dataset.
    pub fn temporal_split(&self, test_fraction: f64) -> Result<TemporalSplit, ForecastError> {
        if !(test_fraction.is_finite() && test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(ForecastError::InvalidInput(format!(
                "test fraction must be in (0, 1), got {test_fraction}"
            )));
        }
        let n = self.samples.len();
        let n_test = (test_fraction * n as f64).ceil() as usize;
        if n_test == 0 || n_test >= n {
            return Err(ForecastError::InsufficientData {
                required: 2,
                got: n,
            });
        }
        let n_train = n - n_test;
        Ok(TemporalSplit {
            train: self.samples[..n_train].to_vec(),
            test: self.samples[n_train..].to_vec(),
        })
    }
}

/// Regression hyperparameters for one RBF support-vector regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvrParams {
    /// Regularization strength.
    pub c: f64,
    /// Half-width of the insensitive tube.
    pub epsilon: f64,
    /// RBF kernel width: `k(x, z) = exp(-gamma * |x - z|^2)`.
    pub gamma: f64,
}

/// A validated forecast request.
///
/// `n_days` counts "today" as well, so `n_days - 1` future points are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub ticker: String,
    pub n_days: usize,
}

impl ForecastRequest {
    pub fn new(ticker: impl Into<String>, n_days: usize) -> Result<Self, ForecastError> {
        let ticker = normalize_ticker(&ticker.into())?;
        if n_days < 2 {
            return Err(ForecastError::InvalidInput(format!(
                "number of days includes today, so it must be at least 2 (got {n_days})"
            )));
        }
        Ok(Self { ticker, n_days })
    }

    /// Number of future points to predict.
    pub fn horizon(&self) -> usize {
        self.n_days - 1
    }
}

/// Trim and upper-case a ticker symbol, rejecting empty input.
pub fn normalize_ticker(raw: &str) -> Result<String, ForecastError> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(ForecastError::InvalidInput("no stock ticker entered".into()));
    }
    Ok(ticker.to_ascii_uppercase())
}

/// Future day indices `last+1 ..= last+(n_days-1)`.
pub fn future_day_indices(last_day_index: usize, n_days: usize) -> Result<Vec<usize>, ForecastError> {
    if n_days < 2 {
        return Err(ForecastError::InvalidInput(format!(
            "number of days must be at least 2 (got {n_days})"
        )));
    }
    Ok((1..n_days).map(|k| last_day_index + k).collect())
}

/// Display dates for the forecast: `today + k` for `k = 1 .. n_days-1`.
///
/// Fails rather than returning fewer dates than `future_day_indices` would.
pub fn future_dates(today: NaiveDate, n_days: usize) -> Result<Vec<NaiveDate>, ForecastError> {
    if n_days < 2 {
        return Err(ForecastError::InvalidInput(format!(
            "number of days must be at least 2 (got {n_days})"
        )));
    }
    (1..n_days)
        .map(|k| {
            i64::try_from(k)
                .ok()
                .and_then(Duration::try_days)
                .and_then(|d| today.checked_add_signed(d))
                .ok_or_else(|| {
                    ForecastError::InvalidInput(format!("forecast date {today} + {k} days is out of range"))
                })
        })
        .collect()
}

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Company metadata returned alongside the price history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    /// Long business summary, when the profile lookup succeeded.
    #[serde(default)]
    pub description: Option<String>,
}

/// Shown when no business summary could be found for a ticker.
pub const NO_DESCRIPTION: &str = "No company description available; please enter a legitimate stock code.";

impl CompanyProfile {
    /// Best available display name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }
}

/// Date-sorted daily history for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    pub ticker: String,
    pub profile: CompanyProfile,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// One predicted close with its cosmetic date label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub day_index: usize,
    pub predicted_close: f64,
}

/// Where price history comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Yahoo,
    /// Seeded random walk; no network access.
    Synthetic { seed: u64 },
}

/// A forecast run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub request: ForecastRequest,
    pub source: DataSource,
    pub test_fraction: f64,
    pub folds: usize,
    /// Shuffle samples into folds with this seed (contiguous folds when `None`).
    pub fold_seed: Option<u64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// Configuration for the `prices` / `indicator` views.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub ticker: String,
    pub source: DataSource,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Everything one forecast request produced.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub history: PriceHistory,
    pub request: ForecastRequest,
    pub generated_on: NaiveDate,
    pub params: SvrParams,
    pub cv_mae: f64,
    /// MAE on the held-out test suffix.
    pub holdout_mae: Option<f64>,
    pub n_train: usize,
    pub n_test: usize,
    pub last_day_index: usize,
    pub points: Vec<ForecastPoint>,
}

impl ForecastRun {
    pub fn to_file(&self, title: &str) -> ForecastFile {
        ForecastFile {
            tool: "sdash".to_string(),
            ticker: self.request.ticker.clone(),
            company: self.history.profile.name.clone(),
            generated_on: self.generated_on,
            title: title.to_string(),
            n_days: self.request.n_days,
            params: self.params,
            cv_mae: self.cv_mae,
            holdout_mae: self.holdout_mae,
            train_samples: self.n_train,
            test_samples: self.n_test,
            points: self.points.clone(),
        }
    }
}

/// A saved forecast (JSON export).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub ticker: String,
    pub company: Option<String>,
    pub generated_on: NaiveDate,
    pub title: String,
    pub n_days: usize,
    pub params: SvrParams,
    pub cv_mae: f64,
    #[serde(default)]
    pub holdout_mae: Option<f64>,
    pub train_samples: usize,
    pub test_samples: usize,
    pub points: Vec<ForecastPoint>,
}
