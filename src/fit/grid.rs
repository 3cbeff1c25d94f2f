//! Hyperparameter grid for the RBF support-vector regressor.
//!
//! The search space is fixed and deterministic: every combination of the three
//! axes is evaluated. Candidates are enumerated with `C` outermost and `gamma`
//! innermost, which also defines the tie-break order of the search.

use crate::domain::SvrParams;
use crate::error::ForecastError;

pub const DEFAULT_C: [f64; 6] = [0.001, 0.01, 0.1, 1.0, 100.0, 1000.0];

pub const DEFAULT_EPSILON: [f64; 15] = [
    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 50.0, 100.0, 150.0, 1000.0,
];

pub const DEFAULT_GAMMA: [f64; 11] = [0.0001, 0.001, 0.005, 0.1, 1.0, 3.0, 5.0, 8.0, 40.0, 100.0, 1000.0];

#[derive(Debug, Clone, PartialEq)]
pub struct HyperparameterGrid {
    c: Vec<f64>,
    epsilon: Vec<f64>,
    gamma: Vec<f64>,
}

impl Default for HyperparameterGrid {
    fn default() -> Self {
        Self {
            c: DEFAULT_C.to_vec(),
            epsilon: DEFAULT_EPSILON.to_vec(),
            gamma: DEFAULT_GAMMA.to_vec(),
        }
    }
}

impl HyperparameterGrid {
    /// Build a custom grid. `C` and `gamma` must be positive, `epsilon` non-negative.
    pub fn new(c: Vec<f64>, epsilon: Vec<f64>, gamma: Vec<f64>) -> Result<Self, ForecastError> {
        check_axis("C", &c, |v| v > 0.0)?;
        check_axis("epsilon", &epsilon, |v| v >= 0.0)?;
        check_axis("gamma", &gamma, |v| v > 0.0)?;
        Ok(Self { c, epsilon, gamma })
    }

    pub fn c(&self) -> &[f64] {
        &self.c
    }

    pub fn epsilon(&self) -> &[f64] {
        &self.epsilon
    }

    pub fn gamma(&self) -> &[f64] {
        &self.gamma
    }

    /// Number of candidate triples.
    pub fn len(&self) -> usize {
        self.c.len() * self.epsilon.len() * self.gamma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All candidate triples in search order.
    pub fn candidates(&self) -> Vec<SvrParams> {
        let mut out = Vec::with_capacity(self.len());
        for &c in &self.c {
            for &epsilon in &self.epsilon {
                for &gamma in &self.gamma {
                    out.push(SvrParams { c, epsilon, gamma });
                }
            }
        }
        out
    }

    /// Whether every component of `params` is one of this grid's values.
    pub fn contains(&self, params: &SvrParams) -> bool {
        self.c.contains(&params.c) && self.epsilon.contains(&params.epsilon) && self.gamma.contains(&params.gamma)
    }
}

fn check_axis(name: &str, values: &[f64], valid: impl Fn(f64) -> bool) -> Result<(), ForecastError> {
    if values.is_empty() {
        return Err(ForecastError::InvalidInput(format!("{name} grid is empty")));
    }
    if let Some(bad) = values.iter().find(|v| !(v.is_finite() && valid(**v))) {
        return Err(ForecastError::InvalidInput(format!("invalid {name} grid value {bad}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_990_candidates() {
        let grid = HyperparameterGrid::default();
        assert_eq!(grid.len(), 990);
        assert_eq!(grid.candidates().len(), 990);
    }

    #[test]
    fn candidates_vary_gamma_fastest() {
        let grid = HyperparameterGrid::new(vec![1.0, 2.0], vec![0.1], vec![0.5, 5.0]).unwrap();
        let c = grid.candidates();
        assert_eq!(c[0], SvrParams { c: 1.0, epsilon: 0.1, gamma: 0.5 });
        assert_eq!(c[1], SvrParams { c: 1.0, epsilon: 0.1, gamma: 5.0 });
        assert_eq!(c[2], SvrParams { c: 2.0, epsilon: 0.1, gamma: 0.5 });
    }

    #[test]
    fn rejects_bad_axes() {
        assert!(HyperparameterGrid::new(vec![], vec![0.1], vec![1.0]).is_err());
        assert!(HyperparameterGrid::new(vec![0.0], vec![0.1], vec![1.0]).is_err());
        assert!(HyperparameterGrid::new(vec![1.0], vec![-0.1], vec![1.0]).is_err());
        assert!(HyperparameterGrid::new(vec![1.0], vec![0.0], vec![f64::NAN]).is_err());
        assert!(HyperparameterGrid::new(vec![1.0], vec![0.0], vec![1.0]).is_ok());
    }

    #[test]
    fn contains_checks_each_axis() {
        let grid = HyperparameterGrid::default();
        assert!(grid.contains(&SvrParams { c: 100.0, epsilon: 0.5, gamma: 0.001 }));
        assert!(!grid.contains(&SvrParams { c: 2.0, epsilon: 0.5, gamma: 0.001 }));
    }
}
