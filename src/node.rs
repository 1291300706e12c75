use crate::data::{Row, Value};
use crate::errors::VerdictError;
use crate::impurity::{class_counts, ClassCounts};
use crate::question::Question;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A terminal node: the label histogram of the training rows that reached
/// it, with the majority label settled up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    counts: ClassCounts,
    n_rows: usize,
    majority: Value,
}

impl Leaf {
    /// Build a leaf from the rows that reached it.
    ///
    /// The vote is settled here, once: the label with the highest count,
    /// ties resolved to the smallest label so repeated fits of the same
    /// data predict the same thing.
    pub(crate) fn from_rows(rows: &[Row]) -> Result<Self, VerdictError> {
        if rows.is_empty() {
            return Err(VerdictError::EmptyRows("Leaf::from_rows"));
        }
        let counts = class_counts(rows);
        let mut majority = rows[0].label().clone();
        let mut best = 0;
        for (label, &count) in &counts {
            if count > best {
                best = count;
                majority = label.clone();
            }
        }
        Ok(Leaf {
            counts,
            n_rows: rows.len(),
            majority,
        })
    }

    /// Label histogram of the rows that reached this leaf.
    pub fn counts(&self) -> &ClassCounts {
        &self.counts
    }

    /// Number of training rows that reached this leaf.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// The label this leaf predicts.
    pub fn majority_vote(&self) -> &Value {
        &self.majority
    }
}

/// Render as `{Apple: 2, Grape: 1}` with labels in sorted order.
impl Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (label, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", label, count)?;
        }
        write!(f, "}}")
    }
}

/// A node of a fitted tree, either an internal split or a terminal leaf.
///
/// A closed sum type walked by exhaustive matching; nothing in the engine
/// inspects types at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// An internal node: one question and exactly two subtrees.
    Split {
        question: Question,
        /// Information gain the question realized on the training rows.
        gain: f64,
        /// Training rows that reached this node.
        n_rows: usize,
        true_branch: Box<TreeNode>,
        false_branch: Box<TreeNode>,
    },
    /// A terminal node.
    Leaf(Leaf),
}

impl TreeNode {
    /// Whether this node is terminal.
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    fn render(&self, f: &mut fmt::Formatter, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            TreeNode::Leaf(leaf) => writeln!(f, "{}Predict {}", pad, leaf),
            TreeNode::Split {
                question,
                true_branch,
                false_branch,
                ..
            } => {
                writeln!(f, "{}{}", pad, question)?;
                writeln!(f, "{}--> True:", pad)?;
                true_branch.render(f, indent + 1)?;
                writeln!(f, "{}--> False:", pad)?;
                false_branch.render(f, indent + 1)
            }
        }
    }
}

/// Render the subtree as an indented question/branch listing, one node
/// per line, ending with a newline.
impl Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, 0)
    }
}
