//! K-fold cross-validation splits.
//!
//! Folds are contiguous blocks of the (optionally shuffled) sample order. The
//! first `n % k` folds get one extra sample. Index lists inside each fold are
//! sorted ascending so fold contents do not depend on shuffle order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::ForecastError;

/// Train/test indices for one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split `n` samples into `k` folds.
///
/// `seed = None` keeps the original order; `Some(seed)` shuffles reproducibly.
pub fn kfold_splits(n: usize, k: usize, seed: Option<u64>) -> Result<Vec<Fold>, ForecastError> {
    if k < 2 {
        return Err(ForecastError::InvalidInput(format!("fold count must be >= 2, got {k}")));
    }
    if n < k {
        return Err(ForecastError::InsufficientData { required: k, got: n });
    }

    let mut order: Vec<usize> = (0..n).collect();
    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }

    let base = n / k;
    let extra = n % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for f in 0..k {
        let size = base + usize::from(f < extra);
        let end = start + size;

        let mut test = order[start..end].to_vec();
        test.sort_unstable();
        let mut train: Vec<usize> = order[..start].iter().chain(order[end..].iter()).copied().collect();
        train.sort_unstable();

        folds.push(Fold { train, test });
        start = end;
    }
    Ok(folds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_folds_cover_every_sample_once() {
        let folds = kfold_splits(12, 5, None).unwrap();
        assert_eq!(folds.len(), 5);
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2, 2]);
        assert_eq!(folds[0].test, vec![0, 1, 2]);
        assert_eq!(folds[4].test, vec![10, 11]);

        let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.iter().copied()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        for f in &folds {
            assert_eq!(f.train.len() + f.test.len(), 12);
            assert!(f.train.iter().all(|i| !f.test.contains(i)));
        }
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let a = kfold_splits(20, 5, Some(7)).unwrap();
        let b = kfold_splits(20, 5, Some(7)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, kfold_splits(20, 5, None).unwrap());
    }

    #[test]
    fn too_few_samples_is_insufficient_data() {
        let err = kfold_splits(3, 5, None).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientData { required: 5, got: 3 });
        assert!(matches!(kfold_splits(10, 1, None), Err(ForecastError::InvalidInput(_))));
    }
}
