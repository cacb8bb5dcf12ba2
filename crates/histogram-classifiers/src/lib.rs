//! histogram-classifiers: supervised classification of visual-word histograms.
//!
//! Three interchangeable engines share the `HistogramClassifier` contract:
//! an entropy-split decision tree with bottom-up pruning, a multinomial
//! Naive Bayes, and a binary RBF-kernel SVM whose `(C, gamma)` pair is picked
//! by a randomized, cross-validated grid search. Training data is a `Dataset`
//! mapping class names to fixed-length count histograms.
//!
//! The kernel SVM solver sits behind the `SvmSolver` trait; the `linfa`
//! feature (on by default) provides one backed by `linfa-svm`.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod math;
pub mod metrics;
pub mod model_selection;
pub mod models;
pub mod preprocessing;
pub mod stats;

pub use data_handling::{Dataset, Histogram};
pub use error::{ClassifierError, Result};
pub use models::classifier_trait::HistogramClassifier;
