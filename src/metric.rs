use crate::data::Row;
use crate::errors::VerdictError;
use crate::tree::DecisionTree;

/// Fraction of `rows` whose predicted label equals their trailing label.
///
/// # Errors
///
/// [`VerdictError::EmptyRows`] on an empty slice, plus anything
/// [`DecisionTree::predict`] surfaces for rows narrower than the tree's
/// questions.
pub fn accuracy(tree: &DecisionTree, rows: &[Row]) -> Result<f64, VerdictError> {
    if rows.is_empty() {
        return Err(VerdictError::EmptyRows("accuracy"));
    }
    let mut hits = 0_usize;
    for row in rows {
        if &tree.predict(row)? == row.label() {
            hits += 1;
        }
    }
    Ok(hits as f64 / rows.len() as f64)
}
