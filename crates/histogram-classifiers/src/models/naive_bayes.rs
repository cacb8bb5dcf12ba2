//! Laplace-smoothed Naive Bayes over feature-count histograms.
//!
//! Learning aggregates, per class, the number of histograms, the summed count
//! of every feature and the total feature mass. From these:
//!
//! * prior(c) = documents(c) / documents
//! * likelihood(c, f) = (count(c, f) + 1) / mass(c)
//!
//! A query is scored per class as `prior(c) * Π likelihood(c, f) * value(f)`
//! over the features with a non-zero value. The count enters as a linear
//! factor, not as an exponent. Scores are accumulated as sums of logarithms,
//! which ranks the classes the same way as the product without underflowing
//! on long histograms.

use crate::data_handling::{Dataset, LabeledData};
use crate::error::{check_dimension, check_feature_count, ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::HistogramClassifier;

#[derive(Debug, Clone)]
struct BayesModel {
    class_names: Vec<String>,
    priors: Vec<f64>,
    /// `class_count x feature_count`
    likelihoods: Array2<f64>,
}

/// Naive Bayes classifier over histograms.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    feature_count: usize,
    model: Option<BayesModel>,
}

impl NaiveBayes {
    pub fn new(feature_count: usize) -> Result<Self> {
        check_feature_count(feature_count)?;
        Ok(NaiveBayes {
            feature_count,
            model: None,
        })
    }

    pub fn priors(&self) -> Option<&[f64]> {
        self.model.as_ref().map(|m| m.priors.as_slice())
    }

    pub fn prior(&self, class_index: usize) -> Option<f64> {
        self.priors().and_then(|p| p.get(class_index).copied())
    }

    pub fn likelihood(&self, class_index: usize, feature: usize) -> Option<f64> {
        let model = self.model.as_ref()?;
        if class_index >= model.likelihoods.nrows() || feature >= self.feature_count {
            return None;
        }
        Some(model.likelihoods[(class_index, feature)])
    }

    /// Log score of every class for a histogram, in class-index order.
    pub fn log_scores(&self, histogram: &[u32]) -> Result<Vec<f64>> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotTrained)?;
        check_dimension(self.feature_count, histogram)?;

        let scores = model
            .priors
            .iter()
            .enumerate()
            .map(|(class_index, prior)| {
                let likelihoods = model.likelihoods.row_slice(class_index);
                histogram
                    .iter()
                    .zip(likelihoods)
                    .filter(|(&value, _)| value != 0)
                    .fold(prior.ln(), |score, (&value, likelihood)| {
                        score + (likelihood * value as f64).ln()
                    })
            })
            .collect();
        Ok(scores)
    }
}

/// Per-class aggregates collected in one pass over the training examples.
struct ClassTotals {
    documents: Vec<usize>,
    feature_counts: Array2<u64>,
    feature_mass: Vec<u64>,
}

impl ClassTotals {
    fn collect(data: &LabeledData, feature_count: usize) -> Self {
        let class_count = data.class_count();
        let mut totals = ClassTotals {
            documents: vec![0; class_count],
            feature_counts: Array2::from_elem((class_count, feature_count), 0),
            feature_mass: vec![0; class_count],
        };

        for example in &data.examples {
            let class_index = example.class_index();
            totals.documents[class_index] += 1;
            let row = totals.feature_counts.row_slice_mut(class_index);
            for (slot, &value) in row.iter_mut().zip(example.histogram()) {
                *slot += value as u64;
                totals.feature_mass[class_index] += value as u64;
            }
        }
        totals
    }

    fn priors(&self) -> Vec<f64> {
        let total: usize = self.documents.iter().sum();
        self.documents
            .iter()
            .map(|&d| d as f64 / total as f64)
            .collect()
    }

    /// Add-one smoothed likelihood table.
    fn likelihoods(&self) -> Array2<f64> {
        let mut likelihoods = self.feature_counts.mapv(|&count| (count + 1) as f64);
        for (class_index, &mass) in self.feature_mass.iter().enumerate() {
            // a class made only of empty histograms has no mass to normalize by
            let mass = mass.max(1) as f64;
            for value in likelihoods.row_slice_mut(class_index) {
                *value /= mass;
            }
        }
        likelihoods
    }
}

impl HistogramClassifier for NaiveBayes {
    fn learn(&mut self, dataset: &Dataset) -> Result<()> {
        let data = LabeledData::from_dataset(dataset, self.feature_count)?;
        let totals = ClassTotals::collect(&data, self.feature_count);

        let priors = totals.priors();
        let likelihoods = totals.likelihoods();

        for (name, prior) in data.class_names.iter().zip(&priors) {
            log::debug!("Prior of class '{}': {:.4}", name, prior);
        }
        log::info!(
            "Naive Bayes trained on {} histograms across {} classes",
            data.examples.len(),
            data.class_count()
        );

        self.model = Some(BayesModel {
            class_names: data.class_names,
            priors,
            likelihoods,
        });
        Ok(())
    }

    fn classify(&self, histogram: &[u32]) -> Result<&str> {
        let scores = self.log_scores(histogram)?;
        let model = self.model.as_ref().ok_or(ClassifierError::NotTrained)?;

        let mut best = 0;
        for (class_index, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = class_index;
            }
        }
        Ok(&model.class_names[best])
    }

    fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn class_names(&self) -> &[String] {
        self.model
            .as_ref()
            .map(|m| m.class_names.as_slice())
            .unwrap_or(&[])
    }

    fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Dataset {
        vec![
            ("A", vec![vec![5, 0], vec![4, 0]]),
            ("B", vec![vec![0, 5], vec![0, 4]]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn scenario_priors_and_prediction() {
        let mut nb = NaiveBayes::new(2).unwrap();
        nb.learn(&scenario()).unwrap();
        assert!((nb.prior(0).unwrap() - 0.5).abs() < 1e-12);
        assert!((nb.prior(1).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(nb.classify(&[3, 0]).unwrap(), "A");
        assert_eq!(nb.classify(&[0, 3]).unwrap(), "B");
    }

    #[test]
    fn likelihoods_use_add_one_smoothing() {
        let mut nb = NaiveBayes::new(2).unwrap();
        nb.learn(&scenario()).unwrap();
        // class A: counts [9, 0], mass 9
        assert!((nb.likelihood(0, 0).unwrap() - 10.0 / 9.0).abs() < 1e-12);
        assert!((nb.likelihood(0, 1).unwrap() - 1.0 / 9.0).abs() < 1e-12);
        assert_eq!(nb.likelihood(2, 0), None);
    }

    #[test]
    fn priors_sum_to_one_and_likelihoods_are_positive() {
        let dataset: Dataset = vec![
            ("a", vec![vec![1, 0, 0, 2]; 3]),
            ("b", vec![vec![0, 0, 0, 0], vec![0, 7, 0, 0]]),
            ("c", vec![vec![0, 0, 0, 0]]),
        ]
        .into_iter()
        .collect();
        let mut nb = NaiveBayes::new(4).unwrap();
        nb.learn(&dataset).unwrap();

        let sum: f64 = nb.priors().unwrap().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        for class_index in 0..3 {
            for feature in 0..4 {
                let l = nb.likelihood(class_index, feature).unwrap();
                assert!(l > 0.0 && l.is_finite());
            }
        }
    }

    #[test]
    fn query_count_scales_the_likelihood_linearly() {
        let dataset: Dataset = vec![("A", vec![vec![3, 2]]), ("B", vec![vec![1, 4]; 4])]
            .into_iter()
            .collect();
        let mut nb = NaiveBayes::new(2).unwrap();
        nb.learn(&dataset).unwrap();

        // A: 0.2 * (4/5) * 10 = 1.6, B: 0.8 * (5/20) * 10 = 2.0
        // with the count as an exponent A would win
        let scores = nb.log_scores(&[10, 0]).unwrap();
        assert!((scores[0] - 1.6f64.ln()).abs() < 1e-9);
        assert!((scores[1] - 2.0f64.ln()).abs() < 1e-9);
        assert_eq!(nb.classify(&[10, 0]).unwrap(), "B");
    }

    #[test]
    fn empty_query_falls_back_to_the_largest_prior() {
        let dataset: Dataset = vec![
            ("rare", vec![vec![1, 1]]),
            ("common", vec![vec![2, 0], vec![0, 2], vec![1, 1]]),
        ]
        .into_iter()
        .collect();
        let mut nb = NaiveBayes::new(2).unwrap();
        nb.learn(&dataset).unwrap();
        assert_eq!(nb.classify(&[0, 0]).unwrap(), "common");
    }

    #[test]
    fn ties_go_to_the_lowest_class_index() {
        let dataset: Dataset = vec![("x", vec![vec![1, 1]]), ("y", vec![vec![1, 1]])]
            .into_iter()
            .collect();
        let mut nb = NaiveBayes::new(2).unwrap();
        nb.learn(&dataset).unwrap();
        assert_eq!(nb.classify(&[3, 1]).unwrap(), "x");
    }

    #[test]
    fn classify_before_learn_fails() {
        let nb = NaiveBayes::new(3).unwrap();
        assert_eq!(nb.classify(&[0, 1, 2]), Err(ClassifierError::NotTrained));
        assert!(nb.priors().is_none());
    }

    #[test]
    fn zero_features_is_rejected() {
        assert!(matches!(
            NaiveBayes::new(0),
            Err(ClassifierError::Configuration(_))
        ));
    }
}
