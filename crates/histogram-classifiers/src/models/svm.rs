//! Binary RBF-kernel SVM over histograms.
//!
//! The engine turns histograms into rescaled sparse vectors, picks `(C, gamma)`
//! (grid search or a fixed pair) and hands optimization to an `SvmSolver`.
//! Only two-class datasets are supported: the first class name becomes the
//! negative label `0.0`, the second the positive label `1.0`.

use crate::config::{GridSearchConfig, SvmParameterSelection};
use crate::data_handling::{Dataset, LabeledData};
use crate::error::{check_dimension, check_feature_count, ClassifierError, Result};
use crate::models::classifier_trait::HistogramClassifier;
use crate::models::grid_search::{GridSearch, GridSearchOutcome};
use crate::models::solver::{SvmParameter, SvmProblem, SvmSolver};
use crate::preprocessing::MaxScaler;

#[cfg(feature = "linfa")]
use crate::models::linfa_solver::LinfaSolver;

/// Trained state of the SVM engine.
#[derive(Debug, Clone)]
pub struct SvmModel<M> {
    solver_model: M,
    c: f64,
    gamma: f64,
    scaler: MaxScaler,
    /// `[negative, positive]`
    class_names: Vec<String>,
}

impl<M> SvmModel<M> {
    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Maximum training feature value used to rescale inputs.
    pub fn scale(&self) -> u32 {
        self.scaler.max_value()
    }

    pub fn solver_model(&self) -> &M {
        &self.solver_model
    }
}

/// Two-class kernel SVM classifier.
pub struct SvmClassifier<S: SvmSolver> {
    feature_count: usize,
    solver: S,
    selection: SvmParameterSelection,
    model: Option<SvmModel<S::Model>>,
    last_search: Option<GridSearchOutcome>,
}

#[cfg(feature = "linfa")]
impl SvmClassifier<LinfaSolver> {
    /// SVM backed by `linfa-svm`, with grid-searched parameters.
    pub fn new(feature_count: usize) -> Result<Self> {
        Self::with_solver(feature_count, LinfaSolver::default())
    }
}

impl<S: SvmSolver> SvmClassifier<S> {
    pub fn with_solver(feature_count: usize, solver: S) -> Result<Self> {
        check_feature_count(feature_count)?;
        Ok(SvmClassifier {
            feature_count,
            solver,
            selection: SvmParameterSelection::default(),
            model: None,
            last_search: None,
        })
    }

    pub fn with_parameter_selection(mut self, selection: SvmParameterSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_grid_search(self, config: GridSearchConfig) -> Self {
        self.with_parameter_selection(SvmParameterSelection::GridSearch(config))
    }

    /// Skip the search and train with a fixed pair.
    pub fn with_fixed_parameters(self, c: f64, gamma: Option<f64>) -> Self {
        self.with_parameter_selection(SvmParameterSelection::Fixed { c, gamma })
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn model(&self) -> Option<&SvmModel<S::Model>> {
        self.model.as_ref()
    }

    /// `(C, gamma)` of the trained model.
    pub fn parameters(&self) -> Option<(f64, f64)> {
        self.model.as_ref().map(|m| (m.c, m.gamma))
    }

    pub fn scale(&self) -> Option<u32> {
        self.model.as_ref().map(SvmModel::scale)
    }

    /// Outcome of the grid search run by the last successful `learn`.
    pub fn last_search(&self) -> Option<&GridSearchOutcome> {
        self.last_search.as_ref()
    }

    fn default_gamma(&self) -> f64 {
        1.0 / self.feature_count as f64
    }

    /// Labeled sparse problem with every vector rescaled by `scaler`.
    fn build_problem(&self, data: &LabeledData, scaler: &MaxScaler) -> SvmProblem {
        SvmProblem {
            feature_count: self.feature_count,
            labels: data
                .examples
                .iter()
                .map(|e| e.class_index() as f64)
                .collect(),
            instances: data
                .examples
                .iter()
                .map(|e| scaler.transform(e.histogram()))
                .collect(),
        }
    }

    fn select_parameters(
        &self,
        problem: &SvmProblem,
        base: &SvmParameter,
    ) -> Result<(f64, f64, Option<GridSearchOutcome>)> {
        match &self.selection {
            SvmParameterSelection::Fixed { c, gamma } => {
                Ok((*c, gamma.unwrap_or_else(|| self.default_gamma()), None))
            }
            SvmParameterSelection::GridSearch(config) => {
                let search = GridSearch::new(config.clone())?;
                match search.search(&self.solver, problem, base) {
                    Some(outcome) => Ok((outcome.c, outcome.gamma, Some(outcome))),
                    None => {
                        log::warn!("Empty parameter grid, using solver defaults");
                        Ok((base.c, self.default_gamma(), None))
                    }
                }
            }
        }
    }
}

impl<S: SvmSolver> HistogramClassifier for SvmClassifier<S> {
    fn learn(&mut self, dataset: &Dataset) -> Result<()> {
        if dataset.class_count() != 2 {
            return Err(ClassifierError::config(format!(
                "SVM supports exactly 2 classes, got {}",
                dataset.class_count()
            )));
        }
        if let Some((name, _)) = dataset.iter().find(|(_, h)| h.is_empty()) {
            return Err(ClassifierError::config(format!(
                "class '{}' has no histograms",
                name
            )));
        }

        let data = LabeledData::from_dataset(dataset, self.feature_count)?;
        let scaler = MaxScaler::fit(data.examples.iter().map(|e| e.histogram()));
        let problem = self.build_problem(&data, &scaler);
        log::debug!(
            "SVM problem: {} vectors, max feature value {}",
            problem.len(),
            scaler.max_value()
        );

        let base = SvmParameter::default();
        let (c, gamma, outcome) = self.select_parameters(&problem, &base)?;
        let params = base.with_c_gamma(c, gamma);
        let solver_model = self.solver.train(&problem, &params)?;

        log::info!(
            "SVM trained on {} histograms with C={} gamma={}",
            problem.len(),
            c,
            gamma
        );

        self.model = Some(SvmModel {
            solver_model,
            c,
            gamma,
            scaler,
            class_names: data.class_names,
        });
        self.last_search = outcome;
        Ok(())
    }

    fn classify(&self, histogram: &[u32]) -> Result<&str> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotTrained)?;
        check_dimension(self.feature_count, histogram)?;

        let instance = model.scaler.transform(histogram);
        let prediction = self.solver.predict(&model.solver_model, &instance);
        let class_index = if prediction > 0.5 { 1 } else { 0 };
        Ok(&model.class_names[class_index])
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
        "svm"
    }
}
