//! Forecast model trainer: hyperparameter selection, final fit and prediction.
//!
//! `select_and_fit` runs the cross-validated grid search over the training
//! prefix, then refits a fresh regressor with the winning triple on the whole
//! prefix. The resulting [`TrainedModel`] only answers queries for day indices
//! after the last one it was trained on.

use tracing::info;

use crate::domain::{DEFAULT_FOLDS, Sample, SvrParams};
use crate::error::ForecastError;
use crate::fit::cv::kfold_splits;
use crate::fit::grid::HyperparameterGrid;
use crate::fit::search::grid_search;
use crate::models::{SvrModel, SvrOptions};

/// Search settings for [`select_and_fit_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub grid: HyperparameterGrid,
    pub folds: usize,
    /// Shuffle seed for fold assignment; `None` keeps contiguous folds.
    pub fold_seed: Option<u64>,
    pub solver: SvrOptions,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            grid: HyperparameterGrid::default(),
            folds: DEFAULT_FOLDS,
            fold_seed: None,
            solver: SvrOptions::default(),
        }
    }
}

/// A regressor fitted on a training prefix with the selected hyperparameters.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    regressor: SvrModel,
    cv_mae: f64,
    last_day_index: usize,
    n_train: usize,
}

impl TrainedModel {
    pub fn params(&self) -> SvrParams {
        self.regressor.params()
    }

    /// Mean cross-validated MAE of the selected triple.
    pub fn cv_mae(&self) -> f64 {
        self.cv_mae
    }

    /// Largest day index seen during training.
    pub fn last_day_index(&self) -> usize {
        self.last_day_index
    }

    pub fn n_train(&self) -> usize {
        self.n_train
    }

    /// Predict closes for strictly increasing day indices after the training window.
    pub fn predict(&self, future_day_indices: &[usize]) -> Result<Vec<f64>, ForecastError> {
        if future_day_indices.is_empty() {
            return Err(ForecastError::InvalidInput("no day indices to predict".into()));
        }
        let mut prev = self.last_day_index;
        for &day in future_day_indices {
            if day <= prev {
                return Err(ForecastError::InvalidInput(format!(
                    "day index {day} is not after {prev} (indices must be future and strictly increasing)"
                )));
            }
            prev = day;
        }

        Ok(future_day_indices
            .iter()
            .map(|&day| self.regressor.predict(day as f64))
            .collect())
    }
}

/// Select hyperparameters with the default grid and 5 contiguous folds, then fit.
pub fn select_and_fit(training: &[Sample]) -> Result<TrainedModel, ForecastError> {
    select_and_fit_with(training, &TrainerConfig::default())
}

pub fn select_and_fit_with(training: &[Sample], config: &TrainerConfig) -> Result<TrainedModel, ForecastError> {
    if config.folds < 2 {
        return Err(ForecastError::InvalidInput(format!(
            "fold count must be >= 2, got {}",
            config.folds
        )));
    }
    if training.len() < config.folds {
        return Err(ForecastError::InsufficientData {
            required: config.folds,
            got: training.len(),
        });
    }
    if training.windows(2).any(|w| w[1].day_index <= w[0].day_index) {
        return Err(ForecastError::InvalidInput(
            "training day indices must be strictly increasing".into(),
        ));
    }
    if let Some(bad) = training.iter().find(|s| !s.close.is_finite()) {
        return Err(ForecastError::ModelFit(format!(
            "non-finite close {} at day {}",
            bad.close, bad.day_index
        )));
    }

    let x: Vec<f64> = training.iter().map(|s| s.day_index as f64).collect();
    let y: Vec<f64> = training.iter().map(|s| s.close).collect();

    let folds = kfold_splits(training.len(), config.folds, config.fold_seed)?;
    let search = grid_search(&x, &y, &config.grid, &folds, &config.solver)?;
    let best = search.best.params;
    info!(
        c = best.c,
        epsilon = best.epsilon,
        gamma = best.gamma,
        cv_mae = search.best.mean_mae(),
        evaluated = search.scores.len(),
        failed = search.n_failed,
        "selected SVR hyperparameters"
    );

    let regressor = SvrModel::fit(&x, &y, best, &config.solver)?;
    let last_day_index = training.last().map(|s| s.day_index).unwrap_or_default();

    Ok(TrainedModel {
        regressor,
        cv_mae: search.best.mean_mae(),
        last_day_index,
        n_train: training.len(),
    })
}

/// Free-function form of [`TrainedModel::predict`].
pub fn predict(model: &TrainedModel, future_day_indices: &[usize]) -> Result<Vec<f64>, ForecastError> {
    model.predict(future_day_indices)
}
