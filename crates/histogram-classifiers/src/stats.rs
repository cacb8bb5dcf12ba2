//! Label statistics shared by the decision tree: class tallies, Shannon
//! entropy and information gain.
//!
//! All functions accept either owned examples or references to them
//! (`E: Borrow<LabeledExample>`) so that partitions built from borrowed rows
//! and leaves holding owned rows go through the same code.

use std::borrow::Borrow;

use crate::data_handling::LabeledExample;

/// Count how many examples fall into each class.
///
/// The tally has exactly `class_count` slots.
pub fn class_counts<E: Borrow<LabeledExample>>(examples: &[E], class_count: usize) -> Vec<usize> {
    let mut counts = vec![0usize; class_count];
    for example in examples {
        counts[example.borrow().class_index()] += 1;
    }
    counts
}

/// Shannon entropy (base 2) of a class tally.
///
/// Classes with a zero count contribute exactly 0, and an empty tally has
/// entropy 0.
pub fn entropy_from_counts(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;

    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Shannon entropy (base 2) of the labels of `examples`.
pub fn entropy<E: Borrow<LabeledExample>>(examples: &[E], class_count: usize) -> f64 {
    entropy_from_counts(&class_counts(examples, class_count))
}

/// Entropy reduction obtained by splitting `parent` into `left` and `right`.
///
/// Uses the weighted average of the child entropies:
/// `H(parent) - |l|/|p| * H(l) - |r|/|p| * H(r)`.
pub fn information_gain<E: Borrow<LabeledExample>>(
    parent: &[E],
    left: &[E],
    right: &[E],
    class_count: usize,
) -> f64 {
    if parent.is_empty() {
        return 0.0;
    }
    let n = parent.len() as f64;

    entropy(parent, class_count)
        - (left.len() as f64 / n) * entropy(left, class_count)
        - (right.len() as f64 / n) * entropy(right, class_count)
}

/// Information gain of a split given the already computed parent entropy.
///
/// The parent is taken to be exactly `left ∪ right`.
pub fn weighted_gain<E: Borrow<LabeledExample>>(
    parent_entropy: f64,
    left: &[E],
    right: &[E],
    class_count: usize,
) -> f64 {
    let n = (left.len() + right.len()) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p_left = left.len() as f64 / n;
    let p_right = right.len() as f64 / n;

    parent_entropy - p_left * entropy(left, class_count) - p_right * entropy(right, class_count)
}

/// Index of the most frequent class; ties go to the lowest class index.
///
/// Returns `None` for an all-zero tally.
pub fn majority_class(counts: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (class_index, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((class_index, count)),
        }
    }
    best.map(|(class_index, _)| class_index)
}
