use crate::data_handling::Dataset;
use crate::error::Result;

/// Common contract of every histogram classifier.
///
/// `learn` builds a complete model off to the side and installs it only on
/// success, so a failed call leaves any previously trained model in place.
/// `classify` only reads the model; `&mut self` on `learn` keeps the two
/// serialized on a single instance.
pub trait HistogramClassifier {
    /// Train on a dataset mapping class names to histograms.
    fn learn(&mut self, dataset: &Dataset) -> Result<()>;

    /// Name of the predicted class for a histogram.
    fn classify(&self, histogram: &[u32]) -> Result<&str>;

    /// Histogram length fixed at construction.
    fn feature_count(&self) -> usize;

    /// Class names in class-index order, empty before training.
    fn class_names(&self) -> &[String];

    fn is_trained(&self) -> bool;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
