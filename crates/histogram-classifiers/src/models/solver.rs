//! Contract between the SVM engine and the numerical kernel-SVM backend.
//!
//! The engine only prepares data and picks hyper-parameters; optimization is
//! delegated to an `SvmSolver`. Problems are expressed as sparse vectors with
//! 0-based feature indices and labels `0.0` (negative) / `1.0` (positive).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model_selection::KFold;

/// Seed of the fold shuffle used by the default cross-validation.
const CROSS_VALIDATION_SEED: u64 = 0x5eed;

/// One non-zero entry of a sparse feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmNode {
    pub index: usize,
    pub value: f64,
}

pub type SparseVector = Vec<SvmNode>;

/// Labeled training problem.
#[derive(Debug, Clone, PartialEq)]
pub struct SvmProblem {
    /// Dimension of the dense space the sparse vectors live in.
    pub feature_count: usize,
    pub labels: Vec<f64>,
    pub instances: Vec<SparseVector>,
}

impl SvmProblem {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sub-problem made of the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> SvmProblem {
        SvmProblem {
            feature_count: self.feature_count,
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            instances: indices.iter().map(|&i| self.instances[i].clone()).collect(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SvmType {
    CSvc,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KernelType {
    Rbf,
}

/// Solver configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SvmParameter {
    pub svm_type: SvmType,
    pub kernel_type: KernelType,
    pub degree: u32,
    /// RBF width, `k(x, y) = exp(-gamma * |x - y|^2)`.
    pub gamma: f64,
    pub coef0: f64,
    pub nu: f64,
    /// Kernel cache size in MB.
    pub cache_size: f64,
    pub c: f64,
    /// Stopping tolerance.
    pub eps: f64,
    pub p: f64,
    pub shrinking: bool,
    pub probability: bool,
}

impl SvmParameter {
    /// C used when no parameter search runs.
    pub const DEFAULT_C: f64 = 128.0;

    pub fn with_c_gamma(&self, c: f64, gamma: f64) -> Self {
        SvmParameter {
            c,
            gamma,
            ..self.clone()
        }
    }
}

impl Default for SvmParameter {
    fn default() -> Self {
        SvmParameter {
            svm_type: SvmType::CSvc,
            kernel_type: KernelType::Rbf,
            degree: 3,
            gamma: 0.0,
            coef0: 0.0,
            nu: 0.5,
            cache_size: 100.0,
            c: Self::DEFAULT_C,
            eps: 1e-3,
            p: 0.1,
            shrinking: false,
            probability: false,
        }
    }
}

/// A kernel-SVM backend.
///
/// `Sync` so that the grid search can cross-validate candidates in parallel.
pub trait SvmSolver: Sync {
    type Model;

    fn train(&self, problem: &SvmProblem, params: &SvmParameter) -> Result<Self::Model>;

    /// Raw prediction for one vector; the engine maps `> 0.5` to the positive class.
    fn predict(&self, model: &Self::Model, instance: &[SvmNode]) -> f64;

    /// Out-of-fold prediction for every example of `problem`.
    ///
    /// The default trains one model per fold of a seeded `KFold` split.
    /// Fold count is capped at the number of examples.
    fn cross_validate(
        &self,
        problem: &SvmProblem,
        params: &SvmParameter,
        folds: usize,
    ) -> Result<Vec<f64>> {
        let n = problem.len();
        let mut predictions = vec![0.0; n];
        if n == 0 {
            return Ok(predictions);
        }

        let kfold = KFold::new(folds.clamp(1, n)).with_random_state(CROSS_VALIDATION_SEED);
        for (train, test) in kfold.split(n) {
            if test.is_empty() {
                continue;
            }
            let model = self.train(&problem.select(&train), params)?;
            for i in test {
                predictions[i] = self.predict(&model, &problem.instances[i]);
            }
        }
        Ok(predictions)
    }
}
