use crate::data::Row;
use crate::errors::VerdictError;
use crate::impurity::{gini, information_gain};
use crate::question::Question;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The winner of a split search: the question to ask and the information
/// gain realized by asking it on the searched rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitInfo {
    pub question: Question,
    pub gain: f64,
}

/// Partition `rows` by `question`, consuming them.
///
/// Matching rows land in the first output, the rest in the second.
/// Relative order is preserved on both sides and every input row lands in
/// exactly one output. Empty input yields two empty outputs.
///
/// # Errors
///
/// Propagates [`VerdictError::ColumnOutOfRange`] when the question points
/// past a row's width. Questions found by [`find_best_split`] over the
/// same rows cannot trigger it.
pub fn partition(rows: Vec<Row>, question: &Question) -> Result<(Vec<Row>, Vec<Row>), VerdictError> {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for row in rows {
        if question.answer(&row)? {
            matched.push(row);
        } else {
            unmatched.push(row);
        }
    }
    Ok((matched, unmatched))
}

/// Borrowing twin of [`partition`] for the candidate loop, which tries
/// many questions against the same rows without moving them.
pub(crate) fn partition_borrowed<'a>(
    rows: &'a [Row],
    question: &Question,
) -> Result<(Vec<&'a Row>, Vec<&'a Row>), VerdictError> {
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();
    for row in rows {
        if question.answer(row)? {
            matched.push(row);
        } else {
            unmatched.push(row);
        }
    }
    Ok((matched, unmatched))
}

/// Exhaustively try every feature and distinct value as a question and
/// return the best split, or `None` when no candidate has positive gain,
/// meaning the rows are already pure or nothing separates them.
///
/// Candidates run in ascending column order and, within a column, over
/// the sorted set of the column's distinct values, so the search is
/// deterministic. Candidates that leave either side empty separate
/// nothing and are skipped. `feature_names` only decorate the questions
/// for rendering.
///
/// # Errors
///
/// [`VerdictError::EmptyRows`] on empty input,
/// [`VerdictError::NoFeatures`] when rows carry a label but no features.
pub fn find_best_split(
    rows: &[Row],
    feature_names: Option<&[String]>,
) -> Result<Option<SplitInfo>, VerdictError> {
    if rows.is_empty() {
        return Err(VerdictError::EmptyRows("find_best_split"));
    }
    let width = rows[0].width();
    if width < 2 {
        return Err(VerdictError::NoFeatures(width));
    }
    let parent_gini = gini(rows)?;

    let mut best: Option<SplitInfo> = None;
    for column in 0..width - 1 {
        let mut values = BTreeSet::new();
        for row in rows {
            values.insert(row.value_at(column)?.clone());
        }
        for value in values {
            let mut question = Question::new(column, value);
            if let Some(name) = feature_names.and_then(|names| names.get(column)) {
                question = question.with_feature_name(name.clone());
            }
            let (matched, unmatched) = partition_borrowed(rows, &question)?;
            if matched.is_empty() || unmatched.is_empty() {
                continue;
            }
            let gain = information_gain(&matched, &unmatched, parent_gini)?;
            // Ties go to the latest candidate; zero gain never wins.
            let incumbent = best.as_ref().map_or(0.0, |split| split.gain);
            if gain >= incumbent && gain > 0.0 {
                best = Some(SplitInfo { question, gain });
            }
        }
    }
    Ok(best)
}
