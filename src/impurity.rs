//! Impurity
//!
//! Gini impurity and information gain over labeled rows.
use crate::data::{Row, Value};
use crate::errors::VerdictError;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Label histogram of a row collection.
///
/// A `BTreeMap` keyed by label keeps iteration sorted, which makes
/// impurity sums, majority votes and rendering reproducible run to run.
pub type ClassCounts = BTreeMap<Value, usize>;

/// Count the occurrences of each label in `rows`. The label is the
/// trailing cell of every row. An empty collection yields an empty map.
///
/// Accepts owned rows (`&[Row]`) or borrowed ones (`&[&Row]`); the split
/// search partitions by reference and counts the halves without cloning.
pub fn class_counts<R: Borrow<Row>>(rows: &[R]) -> ClassCounts {
    let mut counts = ClassCounts::new();
    for row in rows {
        *counts.entry(row.borrow().label().clone()).or_insert(0) += 1;
    }
    counts
}

/// Gini impurity of `rows`: the chance that two rows drawn at random with
/// replacement carry different labels. `0.0` is pure, a 50/50 two-label
/// mix scores `0.5`.
///
/// # Errors
///
/// [`VerdictError::EmptyRows`] on an empty collection. The impurity of
/// nothing is undefined and never substituted with a sentinel.
pub fn gini<R: Borrow<Row>>(rows: &[R]) -> Result<f64, VerdictError> {
    if rows.is_empty() {
        return Err(VerdictError::EmptyRows("gini"));
    }
    Ok(gini_of(&class_counts(rows), rows.len()))
}

/// Gini impurity from a precomputed histogram over `n_rows` rows.
/// Callers guarantee `n_rows >= 1`.
pub(crate) fn gini_of(counts: &ClassCounts, n_rows: usize) -> f64 {
    let n = n_rows as f64;
    counts
        .values()
        .fold(1.0, |impurity, &count| impurity - (count as f64 / n).powi(2))
}

/// Information gain of a split: the parent impurity minus the
/// size-weighted impurity of the `matched` and `unmatched` sides.
///
/// Both sides recount their labels from scratch; nothing is carried over
/// from the parent's histogram.
///
/// # Errors
///
/// [`VerdictError::EmptyRows`] when either side is empty. The split
/// search filters such candidates out before scoring.
pub fn information_gain<R: Borrow<Row>>(
    matched: &[R],
    unmatched: &[R],
    parent_gini: f64,
) -> Result<f64, VerdictError> {
    if matched.is_empty() || unmatched.is_empty() {
        return Err(VerdictError::EmptyRows("information_gain"));
    }
    let p = matched.len() as f64 / (matched.len() + unmatched.len()) as f64;
    Ok(parent_gini
        - p * gini_of(&class_counts(matched), matched.len())
        - (1.0 - p) * gini_of(&class_counts(unmatched), unmatched.len()))
}
