//! Histogram rescaling for the SVM engine.
//!
//! Every feature value is divided by the largest count seen anywhere in the
//! training set. The factor is fitted once during training and stored with
//! the model, so query histograms are rescaled by exactly the same amount.

use crate::models::solver::{SparseVector, SvmNode};

/// Single global scale factor: the maximum training feature value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxScaler {
    max_value: u32,
}

impl MaxScaler {
    /// Fit from training histograms in one pass.
    pub fn fit<'a, I>(histograms: I) -> Self
    where
        I: IntoIterator<Item = &'a [u32]>,
    {
        let max_value = histograms
            .into_iter()
            .flat_map(|h| h.iter().copied())
            .max()
            .unwrap_or(0);
        MaxScaler { max_value }
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Divisor applied to every value; an all-zero training set leaves values unscaled.
    fn divisor(&self) -> f64 {
        self.max_value.max(1) as f64
    }

    /// Sparse, rescaled representation of a histogram (zero counts omitted).
    pub fn transform(&self, histogram: &[u32]) -> SparseVector {
        let divisor = self.divisor();
        histogram
            .iter()
            .enumerate()
            .filter(|(_, &value)| value != 0)
            .map(|(index, &value)| SvmNode {
                index,
                value: value as f64 / divisor,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_finds_global_maximum() {
        let a = [1u32, 8, 0];
        let b = [3u32, 2, 4];
        let scaler = MaxScaler::fit([&a[..], &b[..]]);
        assert_eq!(scaler.max_value(), 8);
    }

    #[test]
    fn transform_drops_zeros_and_rescales() {
        let scaler = MaxScaler { max_value: 4 };
        let sparse = scaler.transform(&[0, 2, 0, 4]);
        assert_eq!(
            sparse,
            vec![
                SvmNode {
                    index: 1,
                    value: 0.5
                },
                SvmNode {
                    index: 3,
                    value: 1.0
                },
            ]
        );
    }

    #[test]
    fn query_values_above_training_max_are_not_clamped() {
        let scaler = MaxScaler { max_value: 2 };
        assert_eq!(scaler.transform(&[6])[0].value, 3.0);
    }

    #[test]
    fn all_zero_training_set_does_not_divide_by_zero() {
        let zeros = [0u32, 0];
        let scaler = MaxScaler::fit([&zeros[..]]);
        assert_eq!(scaler.max_value(), 0);
        assert_eq!(scaler.transform(&[3, 0])[0].value, 3.0);
    }
}
