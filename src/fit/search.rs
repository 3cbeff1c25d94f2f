//! Exhaustive cross-validated grid search.
//!
//! Each candidate triple is scored independently (in parallel) as the mean,
//! over folds, of the negative mean absolute error on the held-out fold.
//! Higher is better.
//!
//! Selection is deterministic: the highest mean score wins and ties go to the
//! lowest candidate index, regardless of how rayon scheduled the work.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::SvrParams;
use crate::error::ForecastError;
use crate::fit::cv::Fold;
use crate::fit::grid::HyperparameterGrid;
use crate::models::{SvrModel, SvrOptions};

/// Cross-validation result for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Position in [`HyperparameterGrid::candidates`].
    pub idx: usize,
    pub params: SvrParams,
    /// Mean over folds of `-MAE`.
    pub mean_score: f64,
    pub fold_mae: Vec<f64>,
}

impl CandidateScore {
    pub fn mean_mae(&self) -> f64 {
        -self.mean_score
    }
}

#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub best: CandidateScore,
    /// Scores of every candidate that fit on all folds, in candidate order.
    pub scores: Vec<CandidateScore>,
    /// Candidates dropped because a fold fit failed.
    pub n_failed: usize,
}

/// Mean absolute error of two equal-length slices.
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let sum: f64 = y_true.iter().zip(y_pred.iter()).map(|(a, b)| (a - b).abs()).sum();
    let mae = sum / y_true.len() as f64;
    mae.is_finite().then_some(mae)
}

/// Score every grid candidate over `folds` and return the best.
pub fn grid_search(
    x: &[f64],
    y: &[f64],
    grid: &HyperparameterGrid,
    folds: &[Fold],
    opts: &SvrOptions,
) -> Result<GridSearchResult, ForecastError> {
    if folds.is_empty() {
        return Err(ForecastError::InvalidInput("no cross-validation folds".into()));
    }
    let candidates = grid.candidates();

    let scores: Vec<CandidateScore> = candidates
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &params)| {
            evaluate_candidate(x, y, params, folds, opts).map(|fold_mae| {
                let mean_mae = fold_mae.iter().sum::<f64>() / fold_mae.len() as f64;
                CandidateScore {
                    idx,
                    params,
                    mean_score: -mean_mae,
                    fold_mae,
                }
            })
        })
        .collect();

    let n_failed = candidates.len() - scores.len();
    if scores.is_empty() {
        return Err(ForecastError::ModelFit(format!(
            "all {} hyperparameter candidates failed to fit",
            candidates.len()
        )));
    }

    let mut best = &scores[0];
    for s in &scores[1..] {
        if s.mean_score > best.mean_score || (s.mean_score == best.mean_score && s.idx < best.idx) {
            best = s;
        }
    }
    debug!(
        candidates = candidates.len(),
        failed = n_failed,
        best_idx = best.idx,
        best_mae = best.mean_mae(),
        "grid search finished"
    );

    Ok(GridSearchResult {
        best: best.clone(),
        scores,
        n_failed,
    })
}

/// Per-fold MAE for one candidate, or `None` if any fold fails.
fn evaluate_candidate(
    x: &[f64],
    y: &[f64],
    params: SvrParams,
    folds: &[Fold],
    opts: &SvrOptions,
) -> Option<Vec<f64>> {
    let mut out = Vec::with_capacity(folds.len());
    for fold in folds {
        let x_train: Vec<f64> = fold.train.iter().map(|&i| x[i]).collect();
        let y_train: Vec<f64> = fold.train.iter().map(|&i| y[i]).collect();
        let model = SvrModel::fit(&x_train, &y_train, params, opts).ok()?;

        let y_test: Vec<f64> = fold.test.iter().map(|&i| y[i]).collect();
        let y_pred: Vec<f64> = fold.test.iter().map(|&i| model.predict(x[i])).collect();
        out.push(mean_absolute_error(&y_test, &y_pred)?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::cv::kfold_splits;

    #[test]
    fn mae_basic() {
        assert_eq!(mean_absolute_error(&[1.0, 2.0], &[2.0, 0.0]), Some(1.5));
        assert_eq!(mean_absolute_error(&[], &[]), None);
        assert_eq!(mean_absolute_error(&[1.0], &[f64::NAN]), None);
    }

    #[test]
    fn prefers_tight_tube_on_clean_data() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 20.0 + 0.2 * v).collect();
        // The huge tube can only predict a constant; the small one tracks the trend.
        let grid = HyperparameterGrid::new(vec![100.0], vec![1000.0, 0.01], vec![0.001]).unwrap();
        let folds = kfold_splits(x.len(), 5, None).unwrap();
        let result = grid_search(&x, &y, &grid, &folds, &SvrOptions::default()).unwrap();
        assert_eq!(result.best.params.epsilon, 0.01);
        assert_eq!(result.scores.len(), 2);
        assert_eq!(result.n_failed, 0);
        assert!(result.best.mean_mae() < result.scores[0].mean_mae());
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        // With an enormous tube every candidate predicts the fold midrange,
        // so all scores tie exactly.
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let grid = HyperparameterGrid::new(vec![1.0, 10.0], vec![1000.0], vec![0.1, 1.0]).unwrap();
        let folds = kfold_splits(x.len(), 5, None).unwrap();
        let result = grid_search(&x, &y, &grid, &folds, &SvrOptions::default()).unwrap();
        assert_eq!(result.best.idx, 0);
    }

    #[test]
    fn all_failing_candidates_is_model_fit_error() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut y: Vec<f64> = x.clone();
        y[3] = f64::NAN;
        let grid = HyperparameterGrid::new(vec![1.0], vec![0.1], vec![0.1]).unwrap();
        let folds = kfold_splits(x.len(), 5, None).unwrap();
        let err = grid_search(&x, &y, &grid, &folds, &SvrOptions::default()).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit(_)));
    }
}
