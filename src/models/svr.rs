//! RBF-kernel ε-support-vector regression on a scalar feature.
//!
//! Thin wrapper over `linfa_svm::Svm<f64, f64>`: the day index is the single
//! feature column. linfa's Gaussian kernel is `exp(-|x - z|^2 / w)`, so the
//! kernel width is `w = 1 / gamma`.

use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use tracing::debug;

use crate::domain::SvrParams;
use crate::error::ForecastError;

/// Solver settings passed through to linfa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvrOptions {
    /// Stopping tolerance on the KKT gap.
    pub tol: f64,
    pub shrinking: bool,
}

impl Default for SvrOptions {
    fn default() -> Self {
        Self {
            tol: 1e-3,
            shrinking: true,
        }
    }
}

/// A fitted support-vector regressor.
#[derive(Debug, Clone)]
pub struct SvrModel {
    params: SvrParams,
    svm: Svm<f64, f64>,
}

impl SvrModel {
    /// Fit on `(x, y)` pairs with the given hyperparameters.
    pub fn fit(x: &[f64], y: &[f64], params: SvrParams, opts: &SvrOptions) -> Result<Self, ForecastError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ForecastError::ModelFit(format!(
                "feature/target length mismatch ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        if !(params.gamma.is_finite() && params.gamma > 0.0) {
            return Err(ForecastError::ModelFit(format!("invalid gamma {}", params.gamma)));
        }
        if !(params.c.is_finite() && params.c > 0.0 && params.epsilon.is_finite() && params.epsilon >= 0.0) {
            return Err(ForecastError::ModelFit(format!(
                "invalid C={} / epsilon={}",
                params.c, params.epsilon
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit("non-finite training value".into()));
        }

        let dataset = Dataset::new(column(x)?, Array1::from_vec(y.to_vec()));
        let svm = Svm::<f64, f64>::params()
            .c_eps(params.c, params.epsilon)
            .gaussian_kernel(1.0 / params.gamma)
            .eps(opts.tol)
            .shrinking(opts.shrinking)
            .fit(&dataset)
            .map_err(|e| {
                ForecastError::ModelFit(format!(
                    "SVR fit failed (C={}, epsilon={}, gamma={}): {e}",
                    params.c, params.epsilon, params.gamma
                ))
            })?;

        debug!(n = x.len(), n_support = svm.nsupport(), "fitted SVR");
        Ok(Self { params, svm })
    }

    pub fn params(&self) -> SvrParams {
        self.params
    }

    pub fn n_support(&self) -> usize {
        self.svm.nsupport()
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.predict_many(&[x]).first().copied().unwrap_or(f64::NAN)
    }

    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        match column(xs) {
            Ok(records) => self.svm.predict(&records).to_vec(),
            Err(_) => vec![f64::NAN; xs.len()],
        }
    }
}

/// `n x 1` feature matrix.
fn column(xs: &[f64]) -> Result<Array2<f64>, ForecastError> {
    Array2::from_shape_vec((xs.len(), 1), xs.to_vec())
        .map_err(|e| ForecastError::ModelFit(format!("feature matrix: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(c: f64, epsilon: f64, gamma: f64) -> SvrParams {
        SvrParams { c, epsilon, gamma }
    }

    #[test]
    fn fit_reproduces_training_curve() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 50.0 + 0.3 * v).collect();
        let model = SvrModel::fit(&x, &y, params(1000.0, 0.05, 0.01), &SvrOptions::default()).unwrap();
        assert!(model.n_support() > 0);
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            assert!((model.predict(xi) - yi).abs() < 0.5);
        }
    }

    #[test]
    fn wide_tube_predicts_a_constant() {
        // Every target sits inside the tube, so no support vectors are needed.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [10.0, 14.0, 11.0, 13.0];
        let model = SvrModel::fit(&x, &y, params(1.0, 100.0, 0.5), &SvrOptions::default()).unwrap();
        let out = model.predict_many(&[0.0, 2.5, 40.0]);
        assert!((out[0] - out[1]).abs() < 1e-9 && (out[1] - out[2]).abs() < 1e-9);
    }

    #[test]
    fn predict_many_preserves_order() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 2.0, 3.0, 2.0, 1.0];
        let model = SvrModel::fit(&x, &y, params(10.0, 0.1, 0.5), &SvrOptions::default()).unwrap();
        let q = [4.0, 0.0, 2.0];
        let out = model.predict_many(&q);
        assert_eq!(out.len(), 3);
        for (o, &xq) in out.iter().zip(q.iter()) {
            assert!((o - model.predict(xq)).abs() < 1e-12);
        }
    }

    #[test]
    fn fit_rejects_mismatched_lengths() {
        let err = SvrModel::fit(&[0.0, 1.0], &[1.0], params(1.0, 0.1, 1.0), &SvrOptions::default()).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit(_)));
    }

    #[test]
    fn fit_rejects_non_finite_targets() {
        let err = SvrModel::fit(
            &[0.0, 1.0],
            &[1.0, f64::INFINITY],
            params(1.0, 0.1, 1.0),
            &SvrOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit(_)));
    }

    #[test]
    fn fit_rejects_bad_hyperparameters() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        for p in [params(0.0, 0.1, 1.0), params(1.0, -0.1, 1.0), params(1.0, 0.1, 0.0)] {
            assert!(matches!(
                SvrModel::fit(&x, &y, p, &SvrOptions::default()),
                Err(ForecastError::ModelFit(_))
            ));
        }
    }
}
