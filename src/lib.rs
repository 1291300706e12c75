//! CART decision trees for tabular data with mixed numeric and
//! categorical features: Gini impurity split search, recursive
//! induction and read-only majority-vote classification.

// Modules
pub mod data;
pub mod errors;
pub mod impurity;
pub mod metric;
pub mod node;
pub mod question;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::{ColumnKind, Dataset, Row, Value};
pub use errors::VerdictError;
pub use impurity::{class_counts, gini, information_gain, ClassCounts};
pub use metric::accuracy;
pub use node::{Leaf, TreeNode};
pub use question::Question;
pub use splitter::{find_best_split, partition, SplitInfo};
pub use tree::DecisionTree;
