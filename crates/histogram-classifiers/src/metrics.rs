//! Held-out evaluation of a trained classifier.

use crate::data_handling::Dataset;
use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::HistogramClassifier;

/// Accuracy and confusion matrix over a labeled dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Class names of the evaluated model, in class-index order.
    pub class_names: Vec<String>,
    /// `confusion[(true, predicted)]`, both indices into `class_names`.
    pub confusion: Array2<usize>,
    pub correct: usize,
    pub total: usize,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// Fraction of the examples of `class_index` that were classified correctly.
    pub fn recall(&self, class_index: usize) -> Option<f64> {
        let n = self.class_names.len();
        if class_index >= n {
            return None;
        }
        let row = &self.confusion.as_slice()[class_index * n..(class_index + 1) * n];
        let support: usize = row.iter().sum();
        (support > 0).then(|| row[class_index] as f64 / support as f64)
    }
}

fn class_index(names: &[String], name: &str) -> Option<usize> {
    names.iter().position(|n| n == name)
}

/// Classify every histogram of `dataset` and tally the results.
///
/// Every class of `dataset` must be known to the classifier.
pub fn evaluate<C>(classifier: &C, dataset: &Dataset) -> Result<Evaluation>
where
    C: HistogramClassifier + ?Sized,
{
    if !classifier.is_trained() {
        return Err(ClassifierError::NotTrained);
    }
    let class_names = classifier.class_names().to_vec();
    let n = class_names.len();
    let mut confusion = Array2::from_elem((n, n), 0usize);
    let mut correct = 0;
    let mut total = 0;

    for (name, histograms) in dataset.iter() {
        let truth = class_index(&class_names, name).ok_or_else(|| {
            ClassifierError::config(format!("class {:?} is unknown to the model", name))
        })?;
        for histogram in histograms {
            let predicted = classifier.classify(histogram)?;
            // classify only returns names of trained classes
            let predicted = class_index(&class_names, predicted).unwrap_or(truth);
            confusion[(truth, predicted)] += 1;
            correct += usize::from(truth == predicted);
            total += 1;
        }
    }

    log::info!(
        "{}: {}/{} correct ({:.2}%)",
        classifier.name(),
        correct,
        total,
        100.0 * correct as f64 / total.max(1) as f64
    );

    Ok(Evaluation {
        class_names,
        confusion,
        correct,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decision_tree::DecisionTree;
    use crate::models::naive_bayes::NaiveBayes;

    fn training() -> Dataset {
        vec![
            ("A", vec![vec![5, 0], vec![4, 0]]),
            ("B", vec![vec![0, 5], vec![0, 4]]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn tallies_confusion_matrix() {
        let mut model = NaiveBayes::new(2).unwrap();
        model.learn(&training()).unwrap();

        let held_out: Dataset = vec![
            ("A", vec![vec![6, 0], vec![0, 7]]),
            ("B", vec![vec![0, 3]]),
        ]
        .into_iter()
        .collect();
        let eval = evaluate(&model, &held_out).unwrap();

        assert_eq!(eval.total, 3);
        assert_eq!(eval.correct, 2);
        assert!((eval.accuracy() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(eval.confusion[(0, 0)], 1);
        assert_eq!(eval.confusion[(0, 1)], 1);
        assert_eq!(eval.confusion[(1, 1)], 1);
        assert_eq!(eval.recall(0), Some(0.5));
        assert_eq!(eval.recall(1), Some(1.0));
    }

    #[test]
    fn works_through_trait_objects() {
        let mut model: Box<dyn HistogramClassifier> = Box::new(DecisionTree::new(2).unwrap());
        model.learn(&training()).unwrap();
        let eval = evaluate(model.as_ref(), &training()).unwrap();
        assert_eq!(eval.accuracy(), 1.0);
    }

    #[test]
    fn unknown_class_is_an_error() {
        let mut model = NaiveBayes::new(2).unwrap();
        model.learn(&training()).unwrap();
        let other: Dataset = vec![("C", vec![vec![1, 1]])].into_iter().collect();
        assert!(matches!(
            evaluate(&model, &other),
            Err(ClassifierError::Configuration(_))
        ));
    }

    #[test]
    fn untrained_model_is_rejected() {
        let model = NaiveBayes::new(2).unwrap();
        assert_eq!(
            evaluate(&model, &training()),
            Err(ClassifierError::NotTrained)
        );
    }
}
