//! Exponentially weighted moving mean (the dashboard's trend indicator).
//!
//! Uses the recursive form with `α = 2 / (span + 1)`:
//!
//! ```text
//! y_0 = x_0
//! y_t = (1 - α) y_{t-1} + α x_t
//! ```

use crate::error::ForecastError;

/// Smooth `values` with span `span`.
///
/// Non-finite inputs are skipped: the previous mean is carried forward. Leading
/// non-finite values stay non-finite until the first finite observation.
pub fn ewm_mean(values: &[f64], span: usize) -> Result<Vec<f64>, ForecastError> {
    if span == 0 {
        return Err(ForecastError::InvalidInput("EWM span must be >= 1".into()));
    }
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match (prev, x.is_finite()) {
            (None, true) => Some(x),
            (Some(p), true) => Some((1.0 - alpha) * p + alpha * x),
            (p, false) => p,
        };
        out.push(next.unwrap_or(f64::NAN));
        prev = next;
    }
    Ok(out)
}
