//! K-fold splitting for cross-validation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// K-Fold cross-validator.
///
/// Splits `n` sample indices into `k` consecutive folds, optionally after a
/// seeded shuffle. Each fold is the test set once while the remaining folds
/// form the training set. The first `n % k` folds receive one extra sample.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    random_state: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            random_state: None,
        }
    }

    /// Shuffle indices with a seeded RNG before splitting.
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// `(train_indices, test_indices)` for every fold.
    ///
    /// With more folds than samples, the trailing folds have empty test sets.
    pub fn split(&self, n_samples: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        let mut indices: Vec<usize> = (0..n_samples).collect();

        if let Some(seed) = self.random_state {
            indices.shuffle(&mut StdRng::seed_from_u64(seed));
        }

        let n_splits = self.n_splits.max(1);
        let fold_size = n_samples / n_splits;
        let remainder = n_samples % n_splits;

        let mut result = Vec::with_capacity(n_splits);
        let mut start = 0;
        for i in 0..n_splits {
            let current = if i < remainder { fold_size + 1 } else { fold_size };
            let end = start + current;

            let test: Vec<usize> = indices[start..end].to_vec();
            let mut train = Vec::with_capacity(n_samples - current);
            train.extend_from_slice(&indices[..start]);
            train.extend_from_slice(&indices[end..]);

            result.push((train, test));
            start = end;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_partition_all_samples() {
        let splits = KFold::new(3).split(10);
        assert_eq!(splits.len(), 3);
        let sizes: Vec<usize> = splits.iter().map(|(_, test)| test.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let mut seen: Vec<usize> = splits.iter().flat_map(|(_, t)| t.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());

        for (train, test) in &splits {
            assert_eq!(train.len() + test.len(), 10);
            assert!(test.iter().all(|i| !train.contains(i)));
        }
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let a = KFold::new(5).with_random_state(7).split(20);
        let b = KFold::new(5).with_random_state(7).split(20);
        assert_eq!(a, b);
        assert_ne!(a, KFold::new(5).split(20));
    }

    #[test]
    fn more_folds_than_samples() {
        let splits = KFold::new(5).split(2);
        assert_eq!(splits.len(), 5);
        assert_eq!(splits.iter().filter(|(_, t)| !t.is_empty()).count(), 2);
    }
}
