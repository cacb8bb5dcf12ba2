use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ClassifierError, Result};

/// Default pruning threshold for the decision tree.
pub const DEFAULT_MIN_GAIN: f64 = 0.1;

/// Central configuration for building a classifier through the factory.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Length of every histogram the classifier will see.
    pub feature_count: usize,

    #[serde(flatten)]
    pub model_type: ModelType,
}

impl ModelConfig {
    pub fn new(feature_count: usize, model_type: ModelType) -> Self {
        Self {
            feature_count,
            model_type,
        }
    }
}

/// Supported engines and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    DecisionTree {
        min_gain: f64,
        prune: bool,
        merge_criterion: MergeCriterion,
    },
    NaiveBayes,
    #[cfg(feature = "linfa")]
    Svm { parameters: SvmParameterSelection },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::DecisionTree {
            min_gain: DEFAULT_MIN_GAIN,
            prune: true,
            merge_criterion: MergeCriterion::default(),
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" | "decision_tree" => Ok(ModelType::default()),
            "naive_bayes" | "bayes" => Ok(ModelType::NaiveBayes),
            #[cfg(feature = "linfa")]
            "svm" => Ok(ModelType::Svm {
                parameters: SvmParameterSelection::default(),
            }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: tree, naive_bayes, svm (svm requires the `linfa` feature)",
                s
            )),
        }
    }
}

/// How the tree pruner scores a split whose children are both leaves.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeCriterion {
    /// Information gain of the split with size-weighted child entropies.
    #[default]
    Weighted,
    /// `H(l ∪ r) - (H(l) + H(r) / 2)`, kept for parity with older models.
    Legacy,
}

/// Where the SVM takes its `(C, gamma)` pair from.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SvmParameterSelection {
    GridSearch(GridSearchConfig),
    /// Use a fixed pair. `gamma = None` means `1 / feature_count`.
    Fixed { c: f64, gamma: Option<f64> },
}

impl Default for SvmParameterSelection {
    fn default() -> Self {
        SvmParameterSelection::GridSearch(GridSearchConfig::default())
    }
}

/// Inclusive range of base-2 exponents, `begin, begin + step, ... <= end`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentRange {
    pub begin: i32,
    pub end: i32,
    pub step: i32,
}

impl ExponentRange {
    pub const fn new(begin: i32, end: i32, step: i32) -> Self {
        Self { begin, end, step }
    }

    /// Materialize the exponents in ascending order.
    pub fn exponents(&self) -> Vec<i32> {
        if self.step <= 0 {
            return Vec::new();
        }
        (self.begin..=self.end).step_by(self.step as usize).collect()
    }
}

/// Settings of the `(C, gamma)` grid search.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridSearchConfig {
    pub c_exponents: ExponentRange,
    pub gamma_exponents: ExponentRange,
    /// Number of cross-validation folds per candidate.
    pub folds: usize,
    /// The search runs on at most this many training examples.
    pub max_examples: usize,
    /// Stop after this many evaluated pairs.
    pub max_iterations: usize,
    /// Stop as soon as a pair reaches this cross-validation accuracy.
    pub accuracy_threshold: f64,
    /// Seed for the candidate shuffle and example subsampling.
    pub seed: Option<u64>,
    /// Evaluate candidates on the rayon thread pool.
    pub parallel: bool,
}

impl GridSearchConfig {
    pub const C_RANGE: ExponentRange = ExponentRange::new(-5, 15, 2);
    pub const GAMMA_RANGE: ExponentRange = ExponentRange::new(-15, 3, 2);
    pub const FOLDS: usize = 5;
    pub const MAX_EXAMPLES: usize = 2000;
    pub const MAX_ITERATIONS: usize = 200;
    pub const ACCURACY_THRESHOLD: f64 = 0.90;

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.c_exponents.step <= 0 || self.gamma_exponents.step <= 0 {
            return Err(ClassifierError::config("exponent step must be positive"));
        }
        if self.folds < 2 {
            return Err(ClassifierError::config(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.folds
            )));
        }
        if self.max_examples == 0 || self.max_iterations == 0 {
            return Err(ClassifierError::config(
                "max_examples and max_iterations must be at least 1",
            ));
        }
        if !self.accuracy_threshold.is_finite() {
            return Err(ClassifierError::config("accuracy threshold must be finite"));
        }
        Ok(())
    }
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            c_exponents: Self::C_RANGE,
            gamma_exponents: Self::GAMMA_RANGE,
            folds: Self::FOLDS,
            max_examples: Self::MAX_EXAMPLES,
            max_iterations: Self::MAX_ITERATIONS,
            accuracy_threshold: Self::ACCURACY_THRESHOLD,
            seed: None,
            parallel: false,
        }
    }
}
