//! SVM engine and grid search driven through the public `SvmSolver` seam.

use std::sync::atomic::{AtomicUsize, Ordering};

use histogram_classifiers::config::{ExponentRange, GridSearchConfig};
use histogram_classifiers::models::grid_search::GridSearch;
use histogram_classifiers::models::solver::{SvmNode, SvmParameter, SvmProblem, SvmSolver};
use histogram_classifiers::models::svm::SvmClassifier;
use histogram_classifiers::{ClassifierError, Dataset, HistogramClassifier, Result};

/// Thresholds feature 0 at the midpoint of the two class means.
/// Gamma above 1 is treated as a failed fit.
#[derive(Default)]
struct MidpointSolver {
    trainings: AtomicUsize,
}

impl SvmSolver for MidpointSolver {
    type Model = f64;

    fn train(&self, problem: &SvmProblem, params: &SvmParameter) -> Result<f64> {
        self.trainings.fetch_add(1, Ordering::SeqCst);
        if params.gamma > 1.0 {
            return Err(ClassifierError::Solver("diverged".to_string()));
        }
        let mut sums = [0.0; 2];
        let mut counts = [0usize; 2];
        for (label, instance) in problem.labels.iter().zip(&problem.instances) {
            let class = usize::from(*label > 0.5);
            sums[class] += first_feature(instance);
            counts[class] += 1;
        }
        let mean = |class: usize| sums[class] / counts[class].max(1) as f64;
        Ok((mean(0) + mean(1)) / 2.0)
    }

    fn predict(&self, threshold: &f64, instance: &[SvmNode]) -> f64 {
        if first_feature(instance) > *threshold {
            1.0
        } else {
            0.0
        }
    }
}

fn first_feature(instance: &[SvmNode]) -> f64 {
    instance
        .iter()
        .find(|n| n.index == 0)
        .map(|n| n.value)
        .unwrap_or(0.0)
}

fn dataset() -> Dataset {
    let low = (0..10).map(|i| vec![i % 3, 4]).collect();
    let high = (0..10).map(|i| vec![8 + i % 3, 4]).collect();
    vec![("low", low), ("high", high)].into_iter().collect()
}

fn small_grid() -> GridSearchConfig {
    GridSearchConfig {
        c_exponents: ExponentRange::new(-1, 3, 2),
        gamma_exponents: ExponentRange::new(-3, 3, 2),
        folds: 4,
        ..GridSearchConfig::default().with_seed(3)
    }
}

#[test]
fn grid_searched_svm_separates_classes() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut svm = SvmClassifier::with_solver(2, MidpointSolver::default())
        .unwrap()
        .with_grid_search(small_grid());
    svm.learn(&dataset()).unwrap();

    let search = svm.last_search().expect("grid search ran");
    assert_eq!(search.accuracy, 1.0);
    assert!(search.gamma <= 1.0);
    assert_eq!(svm.parameters(), Some((search.c, search.gamma)));
    assert_eq!(svm.scale(), Some(10));

    assert_eq!(svm.classify(&[0, 4]).unwrap(), "low");
    assert_eq!(svm.classify(&[10, 4]).unwrap(), "high");
}

#[test]
fn fixed_parameters_skip_the_search() {
    let mut svm = SvmClassifier::with_solver(2, MidpointSolver::default())
        .unwrap()
        .with_fixed_parameters(SvmParameter::DEFAULT_C, None);
    svm.learn(&dataset()).unwrap();

    assert_eq!(svm.solver().trainings.load(Ordering::SeqCst), 1);
    assert!(svm.last_search().is_none());
    assert_eq!(svm.parameters(), Some((128.0, 0.5)));
}

#[test]
fn svm_requires_exactly_two_classes() {
    let three: Dataset = vec![
        ("a", vec![vec![1, 0]]),
        ("b", vec![vec![0, 1]]),
        ("c", vec![vec![1, 1]]),
    ]
    .into_iter()
    .collect();
    let mut svm = SvmClassifier::with_solver(2, MidpointSolver::default()).unwrap();
    assert!(matches!(
        svm.learn(&three),
        Err(ClassifierError::Configuration(_))
    ));
    assert!(!svm.is_trained());
}

#[test]
fn search_stops_at_accuracy_threshold() {
    let solver = MidpointSolver::default();
    let problem = SvmProblem {
        feature_count: 1,
        labels: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        instances: [0.1, 0.2, 0.3, 0.7, 0.8, 0.9]
            .iter()
            .map(|&value| vec![SvmNode { index: 0, value }])
            .collect(),
    };
    let config = GridSearchConfig {
        gamma_exponents: ExponentRange::new(-3, -1, 1),
        folds: 3,
        ..small_grid()
    };
    let outcome = GridSearch::new(config)
        .unwrap()
        .search(&solver, &problem, &SvmParameter::default())
        .unwrap();

    assert_eq!(outcome.evaluations, 1);
    assert_eq!(outcome.accuracy, 1.0);
}

#[cfg(feature = "linfa")]
#[test]
fn linfa_backed_svm_end_to_end() {
    let mut svm = SvmClassifier::new(2)
        .unwrap()
        .with_grid_search(GridSearchConfig {
            c_exponents: ExponentRange::new(1, 3, 2),
            gamma_exponents: ExponentRange::new(-1, 1, 2),
            folds: 3,
            ..GridSearchConfig::default().with_seed(5)
        });
    let data: Dataset = vec![
        ("left", (0..8).map(|i| vec![9 + i % 2, i % 2]).collect()),
        ("right", (0..8).map(|i| vec![i % 2, 9 + i % 2]).collect()),
    ]
    .into_iter()
    .collect();
    svm.learn(&data).unwrap();

    assert_eq!(svm.classify(&[10, 0]).unwrap(), "left");
    assert_eq!(svm.classify(&[0, 10]).unwrap(), "right");
}
