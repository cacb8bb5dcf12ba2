use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};

use crate::error::{ClassifierError, Result};
use crate::models::solver::{SvmNode, SvmParameter, SvmProblem, SvmSolver};

/// `SvmSolver` backed by `linfa-svm` (SMO, Gaussian kernel).
///
/// linfa parameterizes the Gaussian kernel as `exp(-|x - y|^2 / eps)`, so
/// `eps = 1 / gamma`. `C` is applied to both classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinfaSolver;

pub struct LinfaModel {
    svm: Svm<f64, bool>,
    feature_count: usize,
}

impl LinfaModel {
    pub fn support_vector_count(&self) -> usize {
        self.svm.nsupport()
    }
}

/// Dense records matrix from sparse rows; indices past `feature_count` are ignored.
fn densify<'a, I>(rows: I, n_rows: usize, feature_count: usize) -> Array2<f64>
where
    I: IntoIterator<Item = &'a [SvmNode]>,
{
    let mut records = Array2::zeros((n_rows, feature_count));
    for (row, instance) in rows.into_iter().enumerate() {
        for node in instance.iter().filter(|n| n.index < feature_count) {
            records[[row, node.index]] = node.value;
        }
    }
    records
}

impl SvmSolver for LinfaSolver {
    type Model = LinfaModel;

    fn train(&self, problem: &SvmProblem, params: &SvmParameter) -> Result<LinfaModel> {
        if !(params.gamma > 0.0) || !(params.c > 0.0) {
            return Err(ClassifierError::config(format!(
                "C and gamma must be positive, got C={} gamma={}",
                params.c, params.gamma
            )));
        }

        let records = densify(
            problem.instances.iter().map(|v| v.as_slice()),
            problem.len(),
            problem.feature_count,
        );
        let targets: Array1<bool> = problem.labels.iter().map(|&l| l > 0.5).collect();
        let dataset = Dataset::new(records, targets);

        let svm = Svm::<f64, bool>::params()
            .eps(params.eps)
            .pos_neg_weights(params.c, params.c)
            .gaussian_kernel(1.0 / params.gamma)
            .fit(&dataset)
            .map_err(|e| ClassifierError::Solver(e.to_string()))?;

        log::trace!(
            "linfa-svm fit C={} gamma={}: {} support vectors",
            params.c,
            params.gamma,
            svm.nsupport()
        );

        Ok(LinfaModel {
            svm,
            feature_count: problem.feature_count,
        })
    }

    fn predict(&self, model: &LinfaModel, instance: &[SvmNode]) -> f64 {
        let records = densify(std::iter::once(instance), 1, model.feature_count);
        let predicted: Array1<bool> = model.svm.predict(&records);
        if predicted[0] {
            1.0
        } else {
            0.0
        }
    }
}
