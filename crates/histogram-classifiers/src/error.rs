use std::error::Error;
use std::fmt;

/// Errors raised while configuring, training or querying a classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The classifier or dataset violates a precondition (class count, feature count, settings).
    Configuration(String),
    /// `classify` was called before a successful `learn`.
    NotTrained,
    /// A histogram does not have the feature count fixed at construction.
    Dimension { expected: usize, actual: usize },
    /// The numerical SVM backend reported a failure.
    Solver(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

impl ClassifierError {
    pub fn config(msg: impl Into<String>) -> Self {
        ClassifierError::Configuration(msg.into())
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            ClassifierError::NotTrained => {
                write!(f, "Classifier has not been trained, call learn() first")
            }
            ClassifierError::Dimension { expected, actual } => write!(
                f,
                "Histogram has {} features but the classifier expects {}",
                actual, expected
            ),
            ClassifierError::Solver(msg) => write!(f, "SVM solver failed: {}", msg),
        }
    }
}

impl Error for ClassifierError {}

/// Check a histogram length against the classifier's feature count.
pub(crate) fn check_dimension(expected: usize, histogram: &[u32]) -> Result<()> {
    if histogram.len() != expected {
        return Err(ClassifierError::Dimension {
            expected,
            actual: histogram.len(),
        });
    }
    Ok(())
}

/// Reject a zero feature count at construction time.
pub(crate) fn check_feature_count(feature_count: usize) -> Result<()> {
    if feature_count == 0 {
        return Err(ClassifierError::config("feature count must be at least 1"));
    }
    Ok(())
}
