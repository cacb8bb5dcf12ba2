//! Entropy-splitting binary decision tree with post-hoc pruning.
//!
//! Induction is greedy and top-down: at every node each feature column is
//! tried with every distinct value it takes in the node's examples as the
//! threshold (`value < threshold` goes left). The candidate with the strictly
//! largest information gain wins; candidates leaving one side empty are
//! skipped. Features and values are enumerated in ascending order, so the
//! first of several equally good candidates is picked deterministically.
//!
//! After induction the tree is pruned bottom-up: a split whose children are
//! both leaves is merged into a single leaf when merging loses less than
//! `min_gain` bits. Children are pruned before their parent, which lets
//! merges cascade towards the root.

use std::collections::BTreeSet;

use crate::config::{MergeCriterion, DEFAULT_MIN_GAIN};
use crate::data_handling::{Dataset, LabeledData, LabeledExample};
use crate::error::{check_dimension, check_feature_count, ClassifierError, Result};
use crate::models::classifier_trait::HistogramClassifier;
use crate::stats::{class_counts, entropy, entropy_from_counts, majority_class, weighted_gain};

/// Gains at or below this are treated as no improvement.
const GAIN_EPSILON: f64 = 1e-12;

/// A node of the decision tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Terminal node holding the training examples that reached it.
    Leaf { examples: Vec<LabeledExample> },
    /// Internal node: `histogram[feature] < threshold` descends left.
    Split {
        feature: usize,
        threshold: u32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Number of split levels below this node; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Total number of training examples stored in the leaves below this node.
    pub fn example_count(&self) -> usize {
        match self {
            TreeNode::Leaf { examples } => examples.len(),
            TreeNode::Split { left, right, .. } => left.example_count() + right.example_count(),
        }
    }

    /// Follow the splits down to the leaf a histogram falls into.
    fn leaf_for(&self, histogram: &[u32]) -> &[LabeledExample] {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { examples } => return examples,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if histogram[*feature] < *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }
}

/// Best split found for a node, with the partitions it produces.
struct SplitCandidate<'a> {
    feature: usize,
    threshold: u32,
    gain: f64,
    left: Vec<&'a LabeledExample>,
    right: Vec<&'a LabeledExample>,
}

/// Search every `(feature, distinct value)` pair for the split with the
/// largest information gain.
fn best_split<'a>(
    examples: &[&'a LabeledExample],
    feature_count: usize,
    class_count: usize,
) -> Option<SplitCandidate<'a>> {
    let current_entropy = entropy(examples, class_count);
    let mut best: Option<SplitCandidate<'a>> = None;

    for feature in 0..feature_count {
        let values: BTreeSet<u32> = examples.iter().map(|e| e.value(feature)).collect();

        for &threshold in &values {
            let (left, right): (Vec<&LabeledExample>, Vec<&LabeledExample>) = examples
                .iter()
                .partition(|e| e.value(feature) < threshold);
            if left.is_empty() || right.is_empty() {
                continue;
            }

            let gain = weighted_gain(current_entropy, &left, &right, class_count);
            let best_gain = best.as_ref().map_or(GAIN_EPSILON, |b| b.gain);
            if gain > best_gain {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    gain,
                    left,
                    right,
                });
            }
        }
    }

    best
}

/// Grow a tree until no split improves the entropy.
fn build_tree(examples: Vec<&LabeledExample>, feature_count: usize, class_count: usize) -> TreeNode {
    if examples.is_empty() {
        return TreeNode::Leaf {
            examples: Vec::new(),
        };
    }

    match best_split(&examples, feature_count, class_count) {
        Some(split) => {
            log::trace!(
                "Split on feature {} at {} (gain {:.4}, {} | {})",
                split.feature,
                split.threshold,
                split.gain,
                split.left.len(),
                split.right.len()
            );
            let left = build_tree(split.left, feature_count, class_count);
            let right = build_tree(split.right, feature_count, class_count);
            TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        None => TreeNode::Leaf {
            examples: examples.into_iter().cloned().collect(),
        },
    }
}

/// Entropy lost by merging two sibling leaves.
fn merge_gain(
    left: &[LabeledExample],
    right: &[LabeledExample],
    criterion: MergeCriterion,
    class_count: usize,
) -> f64 {
    let left_counts = class_counts(left, class_count);
    let right_counts = class_counts(right, class_count);
    let merged_counts: Vec<usize> = left_counts
        .iter()
        .zip(&right_counts)
        .map(|(l, r)| l + r)
        .collect();

    let merged_entropy = entropy_from_counts(&merged_counts);
    let left_entropy = entropy_from_counts(&left_counts);
    let right_entropy = entropy_from_counts(&right_counts);

    match criterion {
        MergeCriterion::Weighted => {
            let n = (left.len() + right.len()) as f64;
            if n == 0.0 {
                return 0.0;
            }
            merged_entropy
                - (left.len() as f64 / n) * left_entropy
                - (right.len() as f64 / n) * right_entropy
        }
        MergeCriterion::Legacy => merged_entropy - (left_entropy + right_entropy / 2.0),
    }
}

/// Rewrite a tree, collapsing low-gain splits into leaves bottom-up.
///
/// Consumes the input; collapsed subtrees are dropped and replaced by a new
/// leaf holding the merged examples.
pub(crate) fn prune_tree(
    node: TreeNode,
    min_gain: f64,
    criterion: MergeCriterion,
    class_count: usize,
) -> TreeNode {
    match node {
        leaf @ TreeNode::Leaf { .. } => leaf,
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            let left = prune_tree(*left, min_gain, criterion, class_count);
            let right = prune_tree(*right, min_gain, criterion, class_count);

            match (left, right) {
                (TreeNode::Leaf { examples: left }, TreeNode::Leaf { examples: right }) => {
                    let delta = merge_gain(&left, &right, criterion, class_count);
                    if delta < min_gain {
                        log::trace!(
                            "Pruning split on feature {} at {} (delta {:.4})",
                            feature,
                            threshold,
                            delta
                        );
                        let mut merged = left;
                        merged.extend(right);
                        TreeNode::Leaf { examples: merged }
                    } else {
                        TreeNode::Split {
                            feature,
                            threshold,
                            left: Box::new(TreeNode::Leaf { examples: left }),
                            right: Box::new(TreeNode::Leaf { examples: right }),
                        }
                    }
                }
                (left, right) => TreeNode::Split {
                    feature,
                    threshold,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            }
        }
    }
}

#[derive(Debug, Clone)]
struct TreeModel {
    class_names: Vec<String>,
    root: TreeNode,
}

/// Decision tree classifier over histograms.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    feature_count: usize,
    min_gain: f64,
    prune: bool,
    merge_criterion: MergeCriterion,
    model: Option<TreeModel>,
}

impl DecisionTree {
    pub fn new(feature_count: usize) -> Result<Self> {
        check_feature_count(feature_count)?;
        Ok(DecisionTree {
            feature_count,
            min_gain: DEFAULT_MIN_GAIN,
            prune: true,
            merge_criterion: MergeCriterion::default(),
            model: None,
        })
    }

    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }

    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn with_merge_criterion(mut self, criterion: MergeCriterion) -> Self {
        self.merge_criterion = criterion;
        self
    }

    pub fn min_gain(&self) -> f64 {
        self.min_gain
    }

    /// Root of the trained tree.
    pub fn root(&self) -> Option<&TreeNode> {
        self.model.as_ref().map(|m| &m.root)
    }

    pub fn depth(&self) -> Option<usize> {
        self.root().map(TreeNode::depth)
    }

    pub fn leaf_count(&self) -> Option<usize> {
        self.root().map(TreeNode::leaf_count)
    }
}

impl HistogramClassifier for DecisionTree {
    fn learn(&mut self, dataset: &Dataset) -> Result<()> {
        let data = LabeledData::from_dataset(dataset, self.feature_count)?;
        let class_count = data.class_count();

        let root = build_tree(data.examples.iter().collect(), self.feature_count, class_count);
        log::debug!(
            "Grown tree: depth {}, {} leaves",
            root.depth(),
            root.leaf_count()
        );

        let root = if self.prune {
            let pruned = prune_tree(root, self.min_gain, self.merge_criterion, class_count);
            log::debug!(
                "Pruned tree (min_gain {}): depth {}, {} leaves",
                self.min_gain,
                pruned.depth(),
                pruned.leaf_count()
            );
            pruned
        } else {
            root
        };

        log::info!(
            "Decision tree trained on {} histograms across {} classes",
            data.examples.len(),
            class_count
        );

        self.model = Some(TreeModel {
            class_names: data.class_names,
            root,
        });
        Ok(())
    }

    fn classify(&self, histogram: &[u32]) -> Result<&str> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotTrained)?;
        check_dimension(self.feature_count, histogram)?;

        let examples = model.root.leaf_for(histogram);
        let counts = class_counts(examples, model.class_names.len());
        // only a tree grown from zero examples has an empty leaf, and learn rejects those
        let class_index = majority_class(&counts).ok_or_else(|| {
            ClassifierError::config("histogram reached a leaf with no examples")
        })?;
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
        "decision_tree"
    }
}
