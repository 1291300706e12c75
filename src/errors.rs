//! Errors
//!
//! Custom error types used throughout the `verdict` crate.
use thiserror::Error;

/// Errors that can occur while validating data, growing a tree, or
/// classifying rows against one.
#[derive(Debug, Error)]
pub enum VerdictError {
    /// An operation that needs at least one row received none.
    #[error("Empty row collection passed to {0}.")]
    EmptyRows(&'static str),
    /// Too few rows for the requested operation.
    #[error("{operation} needs at least {needed} rows, but {got} were provided.")]
    TooFewRows {
        operation: &'static str,
        needed: usize,
        got: usize,
    },
    /// A question referenced a column a row does not have.
    #[error("Column {column} is out of range for a row of width {width}.")]
    ColumnOutOfRange { column: usize, width: usize },
    /// A row's width differs from the width of the first row.
    #[error("Row {row} has {got} values, but {expected} were expected.")]
    RaggedRow { row: usize, got: usize, expected: usize },
    /// A column holds numbers in some rows and text in others.
    #[error("Column {column} mixes numeric and categorical values, first offender at row {row}.")]
    MixedColumn { column: usize, row: usize },
    /// A numeric cell is NaN or infinite.
    #[error("Non-finite number at row {row}, column {column}.")]
    NonFiniteNumber { row: usize, column: usize },
    /// Rows must carry at least one feature column and a trailing label.
    #[error("Rows of width {0} have no feature columns.")]
    NoFeatures(usize),
    /// The feature name list does not line up with the feature columns.
    #[error("Expected {expected} feature names, but {got} were provided.")]
    FeatureNameCount { expected: usize, got: usize },
    /// A fraction parameter fell outside its valid range.
    #[error("Invalid value passed for {parameter}, expected a fraction strictly between 0 and 1 but {value} provided.")]
    InvalidFraction { parameter: &'static str, value: f64 },
    /// Reading a CSV dataset failed.
    #[error("Unable to read CSV data: {0}")]
    Csv(#[from] csv::Error),
}
