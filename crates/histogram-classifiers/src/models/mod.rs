pub mod classifier_trait;
pub mod decision_tree;
pub mod factory;
pub mod grid_search;
#[cfg(feature = "linfa")]
pub mod linfa_solver;
pub mod naive_bayes;
pub mod solver;
pub mod svm;
