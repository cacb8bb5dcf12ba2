//! Data structures for labeled histogram datasets.
//!
//! A `Dataset` is the caller-facing ordered mapping from class name to the
//! histograms of that class. Every engine converts it once into `LabeledData`:
//! a class-index → class-name table plus a flat list of `LabeledExample`s.
//! Class indices are assigned in the dataset's insertion order.

use crate::error::{check_dimension, ClassifierError, Result};

/// Fixed-length vector of non-negative feature counts.
pub type Histogram = Vec<u32>;

/// A histogram paired with the index of the class it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    histogram: Histogram,
    class_index: usize,
}

impl LabeledExample {
    pub fn new(histogram: Histogram, class_index: usize) -> Self {
        LabeledExample {
            histogram,
            class_index,
        }
    }

    pub fn histogram(&self) -> &[u32] {
        &self.histogram
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Value of a single feature column.
    #[inline]
    pub fn value(&self, feature: usize) -> u32 {
        self.histogram[feature]
    }
}

/// Ordered mapping from unique class name to the histograms of that class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    classes: Vec<(String, Vec<Histogram>)>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the histograms of a class.
    ///
    /// A new class is appended at the end; replacing an existing class keeps
    /// its position (and therefore its class index). Returns the replaced
    /// histograms, if any.
    pub fn insert(
        &mut self,
        class_name: impl Into<String>,
        histograms: Vec<Histogram>,
    ) -> Option<Vec<Histogram>> {
        let class_name = class_name.into();
        match self.classes.iter_mut().find(|(name, _)| *name == class_name) {
            Some((_, existing)) => Some(std::mem::replace(existing, histograms)),
            None => {
                self.classes.push((class_name, histograms));
                None
            }
        }
    }

    /// Append a single histogram to a class, creating the class if needed.
    pub fn push(&mut self, class_name: &str, histogram: Histogram) {
        match self.classes.iter_mut().find(|(name, _)| name == class_name) {
            Some((_, existing)) => existing.push(histogram),
            None => self.classes.push((class_name.to_string(), vec![histogram])),
        }
    }

    pub fn get(&self, class_name: &str) -> Option<&[Histogram]> {
        self.classes
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, histograms)| histograms.as_slice())
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Total number of histograms across all classes.
    pub fn len(&self) -> usize {
        self.classes.iter().map(|(_, h)| h.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Histogram])> {
        self.classes
            .iter()
            .map(|(name, histograms)| (name.as_str(), histograms.as_slice()))
    }

    pub fn log_summary(&self) {
        log::info!(
            "Dataset: {} classes, {} histograms",
            self.class_count(),
            self.len()
        );
        for (name, histograms) in self.iter() {
            log::debug!("  class '{}': {} histograms", name, histograms.len());
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<Histogram>)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (S, Vec<Histogram>)>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for (name, histograms) in iter {
            dataset.insert(name, histograms);
        }
        dataset
    }
}

/// Flattened form of a `Dataset` shared by every engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledData {
    pub class_names: Vec<String>,
    pub examples: Vec<LabeledExample>,
}

impl LabeledData {
    /// Convert a dataset, validating every histogram against `feature_count`.
    pub fn from_dataset(dataset: &Dataset, feature_count: usize) -> Result<Self> {
        if dataset.class_count() == 0 {
            return Err(ClassifierError::config("dataset has no classes"));
        }
        if dataset.is_empty() {
            return Err(ClassifierError::config("dataset contains no histograms"));
        }

        let mut class_names = Vec::with_capacity(dataset.class_count());
        let mut examples = Vec::with_capacity(dataset.len());

        for (class_index, (name, histograms)) in dataset.iter().enumerate() {
            class_names.push(name.to_string());
            for histogram in histograms {
                check_dimension(feature_count, histogram)?;
                examples.push(LabeledExample::new(histogram.clone(), class_index));
            }
        }

        Ok(LabeledData {
            class_names,
            examples,
        })
    }

    pub fn class_count(&self) -> usize {
        self.class_names.len()
    }
}
