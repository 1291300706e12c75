use crate::errors::VerdictError;
use crate::utils::validate_fraction;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::io::Read;
use std::path::Path;

/// A single cell of a dataset, either a number or a piece of text.
///
/// The variant decides how a [`Question`](crate::Question) compares
/// against the cell: numbers split by threshold (`>=`), text splits by
/// equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// The column kind this value belongs to.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Number(_) => ColumnKind::Numeric,
            Value::Text(_) => ColumnKind::Categorical,
        }
    }

    /// Whether the value is numeric.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Parse a raw cell. Anything that parses as `f64` becomes a number,
    /// everything else stays categorical text.
    pub fn parse(cell: &str) -> Value {
        match cell.trim().parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(cell.to_string()),
        }
    }
}

/// Total order over cells: numbers before text, numbers by
/// `f64::total_cmp`, text lexicographically. Every deterministic
/// iteration in the crate (candidate enumeration, class counts, vote
/// tie-breaks) leans on this order.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(number) => write!(f, "{}", number),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Number(number as f64)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

/// Kind of a dataset column, established once during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// One observation: feature cells in column order with the label last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from its cells. The last cell is the label.
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Total number of cells, label included.
    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// The cell in `column`, or `ColumnOutOfRange` when the row is too
    /// narrow for it.
    pub fn value_at(&self, column: usize) -> Result<&Value, VerdictError> {
        self.values.get(column).ok_or(VerdictError::ColumnOutOfRange {
            column,
            width: self.values.len(),
        })
    }

    /// The trailing label cell.
    ///
    /// # Panics
    ///
    /// Panics on a row with no cells. [`Dataset`] validation rejects rows
    /// narrower than two cells before they reach the engine.
    pub fn label(&self) -> &Value {
        &self.values[self.values.len() - 1]
    }

    /// The feature cells, everything but the label.
    pub fn features(&self) -> &[Value] {
        &self.values[..self.values.len().saturating_sub(1)]
    }

    /// All cells of the row.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

/// A validated, rectangular collection of rows plus optional feature names.
///
/// Construction runs the schema checks once: uniform row width of at
/// least two, one kind per column, finite numbers, and a name list that
/// lines up with the feature columns. Rows that survive are safe for the
/// whole engine, which is why [`DecisionTree::fit`](crate::DecisionTree::fit)
/// takes a `Dataset` rather than bare rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Row>,
    feature_names: Option<Vec<String>>,
    kinds: Vec<ColumnKind>,
}

impl Dataset {
    /// Validate `rows` and optional `feature_names` into a dataset.
    ///
    /// # Errors
    ///
    /// [`VerdictError::EmptyRows`] on no rows, [`VerdictError::NoFeatures`]
    /// on rows narrower than two cells, [`VerdictError::FeatureNameCount`]
    /// when the name list does not match the feature columns,
    /// [`VerdictError::RaggedRow`] on width drift,
    /// [`VerdictError::MixedColumn`] when a column changes kind between
    /// rows and [`VerdictError::NonFiniteNumber`] on NaN or infinite cells.
    pub fn new(rows: Vec<Row>, feature_names: Option<Vec<String>>) -> Result<Self, VerdictError> {
        if rows.is_empty() {
            return Err(VerdictError::EmptyRows("Dataset::new"));
        }
        let width = rows[0].width();
        if width < 2 {
            return Err(VerdictError::NoFeatures(width));
        }
        if let Some(names) = &feature_names {
            if names.len() != width - 1 {
                return Err(VerdictError::FeatureNameCount {
                    expected: width - 1,
                    got: names.len(),
                });
            }
        }
        // The first row fixes the width and the kind of every column.
        let kinds: Vec<ColumnKind> = rows[0].values().iter().map(Value::kind).collect();
        for (r, row) in rows.iter().enumerate() {
            if row.width() != width {
                return Err(VerdictError::RaggedRow {
                    row: r,
                    got: row.width(),
                    expected: width,
                });
            }
            for (c, value) in row.values().iter().enumerate() {
                if value.kind() != kinds[c] {
                    return Err(VerdictError::MixedColumn { column: c, row: r });
                }
                if let Value::Number(number) = value {
                    if !number.is_finite() {
                        return Err(VerdictError::NonFiniteNumber { row: r, column: c });
                    }
                }
            }
        }
        Ok(Dataset {
            rows,
            feature_names,
            kinds,
        })
    }

    /// Read a dataset from a CSV file.
    ///
    /// With `has_headers` the header row supplies the feature names; the
    /// trailing header cell names the label and is dropped. Cells that
    /// parse as `f64` become numbers, everything else is text.
    pub fn from_csv_path(path: impl AsRef<Path>, has_headers: bool) -> Result<Self, VerdictError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_path(path.as_ref())?;
        Self::read_csv(reader, has_headers)
    }

    /// Read a dataset from any CSV source, such as an in-memory buffer.
    pub fn from_csv_reader<R: Read>(source: R, has_headers: bool) -> Result<Self, VerdictError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(source);
        Self::read_csv(reader, has_headers)
    }

    fn read_csv<R: Read>(mut reader: csv::Reader<R>, has_headers: bool) -> Result<Self, VerdictError> {
        let feature_names = if has_headers {
            let headers = reader.headers()?;
            let names: Vec<String> = headers.iter().map(str::to_string).collect();
            names.split_last().map(|(_, features)| features.to_vec())
        } else {
            None
        };
        // The reader is flexible so that ragged files reach our own width
        // check and report RaggedRow instead of a low-level parse error.
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(Row::new(record.iter().map(Value::parse).collect()));
        }
        let dataset = Self::new(rows, feature_names)?;
        info!(
            "loaded {} rows with {} feature columns from CSV",
            dataset.n_rows(),
            dataset.n_features()
        );
        Ok(dataset)
    }

    /// The validated rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Feature names, when the dataset carries them.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Column kinds in column order, label column included.
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns (width minus the label).
    pub fn n_features(&self) -> usize {
        self.kinds.len() - 1
    }

    /// Shuffle the rows in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.rows.shuffle(rng);
    }

    /// Shuffle and split into `(train, test)`, the test side receiving
    /// `test_fraction` of the rows. Both sides always keep at least one
    /// row.
    ///
    /// # Errors
    ///
    /// [`VerdictError::InvalidFraction`] when `test_fraction` is not
    /// strictly between 0 and 1, [`VerdictError::TooFewRows`] on datasets
    /// with fewer than two rows.
    pub fn train_test_split<R: Rng>(
        mut self,
        test_fraction: f64,
        rng: &mut R,
    ) -> Result<(Dataset, Dataset), VerdictError> {
        validate_fraction(test_fraction, "test_fraction")?;
        if self.rows.len() < 2 {
            return Err(VerdictError::TooFewRows {
                operation: "train_test_split",
                needed: 2,
                got: self.rows.len(),
            });
        }
        self.rows.shuffle(rng);
        let n_test = ((self.rows.len() as f64 * test_fraction).round() as usize)
            .clamp(1, self.rows.len() - 1);
        let test_rows = self.rows.split_off(self.rows.len() - n_test);
        let test = Dataset {
            rows: test_rows,
            feature_names: self.feature_names.clone(),
            kinds: self.kinds.clone(),
        };
        Ok((self, test))
    }

    pub(crate) fn into_parts(self) -> (Vec<Row>, Option<Vec<String>>) {
        (self.rows, self.feature_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fruit_rows() -> Vec<Row> {
        vec![
            Row::new(vec!["Green".into(), 3.into(), "Apple".into()]),
            Row::new(vec!["Yellow".into(), 3.into(), "Apple".into()]),
            Row::new(vec!["Red".into(), 1.into(), "Grape".into()]),
            Row::new(vec!["Red".into(), 1.into(), "Grape".into()]),
            Row::new(vec!["Yellow".into(), 3.into(), "Lemon".into()]),
        ]
    }

    #[test]
    fn test_value_parse() {
        assert_eq!(Value::parse("3"), Value::Number(3.0));
        assert_eq!(Value::parse(" 2.5 "), Value::Number(2.5));
        assert_eq!(Value::parse("Green"), Value::Text("Green".to_string()));
        assert_eq!(Value::parse(""), Value::Text(String::new()));
    }

    #[test]
    fn test_value_order() {
        assert!(Value::from(1.0) < Value::from(2.0));
        assert!(Value::from("Apple") < Value::from("Grape"));
        // Numbers sort before any text.
        assert!(Value::from(100.0) < Value::from("0"));
        assert_eq!(Value::from(3), Value::from(3.0));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("Green").to_string(), "Green");
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::new(vec!["Green".into(), 3.into(), "Apple".into()]);
        assert_eq!(row.width(), 3);
        assert_eq!(row.label(), &Value::from("Apple"));
        assert_eq!(row.features(), &["Green".into(), 3.into()] as &[Value]);
        assert_eq!(row.value_at(0).unwrap(), &Value::from("Green"));
        let err = row.value_at(7).unwrap_err();
        assert!(matches!(
            err,
            VerdictError::ColumnOutOfRange { column: 7, width: 3 }
        ));
    }

    #[test]
    fn test_dataset_rejects_empty() {
        let err = Dataset::new(Vec::new(), None).unwrap_err();
        assert!(matches!(err, VerdictError::EmptyRows(_)));
    }

    #[test]
    fn test_dataset_rejects_label_only_rows() {
        let rows = vec![Row::new(vec!["Apple".into()])];
        let err = Dataset::new(rows, None).unwrap_err();
        assert!(matches!(err, VerdictError::NoFeatures(1)));
    }

    #[test]
    fn test_dataset_rejects_ragged_rows() {
        let rows = vec![
            Row::new(vec!["Green".into(), 3.into(), "Apple".into()]),
            Row::new(vec!["Red".into(), "Grape".into()]),
        ];
        let err = Dataset::new(rows, None).unwrap_err();
        assert!(matches!(
            err,
            VerdictError::RaggedRow {
                row: 1,
                got: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn test_dataset_rejects_mixed_columns() {
        let rows = vec![
            Row::new(vec!["Green".into(), 3.into(), "Apple".into()]),
            Row::new(vec![2.into(), 1.into(), "Grape".into()]),
        ];
        let err = Dataset::new(rows, None).unwrap_err();
        assert!(matches!(err, VerdictError::MixedColumn { column: 0, row: 1 }));
    }

    #[test]
    fn test_dataset_rejects_non_finite_numbers() {
        let rows = vec![
            Row::new(vec!["Green".into(), 3.into(), "Apple".into()]),
            Row::new(vec!["Red".into(), f64::NAN.into(), "Grape".into()]),
        ];
        let err = Dataset::new(rows, None).unwrap_err();
        assert!(matches!(
            err,
            VerdictError::NonFiniteNumber { row: 1, column: 1 }
        ));
    }

    #[test]
    fn test_dataset_rejects_wrong_name_count() {
        let names = vec!["color".to_string()];
        let err = Dataset::new(fruit_rows(), Some(names)).unwrap_err();
        assert!(matches!(
            err,
            VerdictError::FeatureNameCount { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_dataset_kinds() {
        let dataset = Dataset::new(fruit_rows(), None).unwrap();
        assert_eq!(
            dataset.kinds(),
            &[
                ColumnKind::Categorical,
                ColumnKind::Numeric,
                ColumnKind::Categorical
            ]
        );
        assert_eq!(dataset.n_rows(), 5);
        assert_eq!(dataset.n_features(), 2);
    }

    #[test]
    fn test_from_csv_with_headers() {
        let csv = "color,diameter,fruit\nGreen,3,Apple\nRed,1,Grape\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes(), true).unwrap();
        assert_eq!(dataset.n_rows(), 2);
        assert_eq!(
            dataset.feature_names(),
            Some(&["color".to_string(), "diameter".to_string()] as &[String])
        );
        assert_eq!(dataset.rows()[0].value_at(1).unwrap(), &Value::from(3.0));
        assert_eq!(dataset.rows()[1].label(), &Value::from("Grape"));
    }

    #[test]
    fn test_from_csv_without_headers() {
        let csv = "Green,3,Apple\nRed,1,Grape\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes(), false).unwrap();
        assert_eq!(dataset.n_rows(), 2);
        assert_eq!(dataset.feature_names(), None);
    }

    #[test]
    fn test_from_csv_ragged_file() {
        let csv = "Green,3,Apple\nRed,Grape\n";
        let err = Dataset::from_csv_reader(csv.as_bytes(), false).unwrap_err();
        assert!(matches!(err, VerdictError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut first = Dataset::new(fruit_rows(), None).unwrap();
        let mut second = first.clone();
        first.shuffle(&mut StdRng::seed_from_u64(42));
        second.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(first.rows(), second.rows());

        let mut sorted = first.rows().to_vec();
        sorted.sort();
        let mut original = fruit_rows();
        original.sort();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_train_test_split_sizes() {
        let rows: Vec<Row> = (0..10)
            .map(|i| {
                let label = if i < 5 { "A" } else { "B" };
                Row::new(vec![(i as f64).into(), label.into()])
            })
            .collect();
        let dataset = Dataset::new(rows, None).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = dataset.train_test_split(0.3, &mut rng).unwrap();
        assert_eq!(train.n_rows(), 7);
        assert_eq!(test.n_rows(), 3);
    }

    #[test]
    fn test_train_test_split_keeps_both_sides_populated() {
        let rows = vec![
            Row::new(vec![1.into(), "A".into()]),
            Row::new(vec![2.into(), "B".into()]),
            Row::new(vec![3.into(), "A".into()]),
        ];
        let dataset = Dataset::new(rows, None).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = dataset.train_test_split(0.01, &mut rng).unwrap();
        assert_eq!(train.n_rows(), 2);
        assert_eq!(test.n_rows(), 1);
    }

    #[test]
    fn test_train_test_split_rejects_bad_input() {
        let dataset = Dataset::new(fruit_rows(), None).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let err = dataset.clone().train_test_split(1.0, &mut rng).unwrap_err();
        assert!(matches!(err, VerdictError::InvalidFraction { .. }));

        let single = Dataset::new(vec![fruit_rows().remove(0)], None).unwrap();
        let err = single.train_test_split(0.5, &mut rng).unwrap_err();
        assert!(matches!(err, VerdictError::TooFewRows { got: 1, .. }));
    }
}
