use crate::data::{Row, Value};
use crate::errors::VerdictError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A single-feature predicate used to route rows into two branches.
///
/// A question pairs a feature column with a comparison value. Numeric
/// values split by threshold, a row matches when its cell is greater than
/// or equal to the value. Categorical values split by equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    column: usize,
    value: Value,
    feature_name: Option<String>,
}

impl Question {
    /// Create a question against feature `column`. Construction never
    /// fails; a column past a row's width surfaces at the first
    /// [`answer`](Question::answer) call against that row.
    pub fn new(column: usize, value: impl Into<Value>) -> Self {
        Question {
            column,
            value: value.into(),
            feature_name: None,
        }
    }

    /// Attach a feature name. Names affect only rendering, never matching.
    pub fn with_feature_name(mut self, name: impl Into<String>) -> Self {
        self.feature_name = Some(name.into());
        self
    }

    /// The feature column this question tests.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The comparison value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Answer the question for `row`.
    ///
    /// Numbers compare with `>=`, so a cell equal to the comparison value
    /// lands on the true side. Text compares with `==`. A kind mismatch
    /// between the cell and the comparison value never matches; validated
    /// datasets cannot produce one.
    ///
    /// # Errors
    ///
    /// [`VerdictError::ColumnOutOfRange`] when `row` is narrower than the
    /// question's column.
    pub fn answer(&self, row: &Row) -> Result<bool, VerdictError> {
        let observed = row.value_at(self.column)?;
        Ok(match (&self.value, observed) {
            (Value::Number(threshold), Value::Number(cell)) => cell >= threshold,
            (Value::Text(expected), Value::Text(cell)) => cell == expected,
            _ => false,
        })
    }
}

/// Render as `Is <feature> <op> <value>?`, falling back to the column
/// index when no feature name is attached.
impl Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = if self.value.is_number() { ">=" } else { "==" };
        match &self.feature_name {
            Some(name) => write!(f, "Is {} {} {}?", name, op, self.value),
            None => write!(f, "Is {} {} {}?", self.column, op, self.value),
        }
    }
}
