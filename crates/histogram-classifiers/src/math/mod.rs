//! Small dense matrix type used for per-class tables.
//!
//! `Array2` backs the Naive Bayes count and likelihood tables and the
//! confusion matrix returned by `metrics::evaluate`.
pub mod matrix;

pub use matrix::Array2;
