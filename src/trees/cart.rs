//! CART Decision Tree Classifier
use crate::data::dataset::{Dataset, Example, Header};
use crate::error::TreeError;
use crate::trees::classifier::Classifier;
use crate::trees::counts::{ClassCounts, MIN_GAIN};
use std::fmt;
use tracing::{debug, instrument};

/// Equality test of one column against one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitTest {
    column: usize,
    name: String,
    value: String,
}

impl SplitTest {
    pub fn new(header: &Header, column: usize, value: &str) -> Self {
        Self {
            column,
            name: header.column_name(column).to_string(),
            value: value.to_string(),
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn matches(&self, example: &Example) -> bool {
        example.value(self.column) == self.value
    }
}

impl fmt::Display for SplitTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.name, self.value)
    }
}

/// Binary decision tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BinaryNode {
    /// Class frequencies of the training rows that reached the leaf.
    Leaf(ClassCounts),
    /// Rows matching `test` go to `true_branch`, all others to `false_branch`.
    Split {
        test: SplitTest,
        true_branch: Box<BinaryNode>,
        false_branch: Box<BinaryNode>,
    },
}

impl BinaryNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, BinaryNode::Leaf(_))
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            BinaryNode::Leaf(_) => 1,
            BinaryNode::Split {
                true_branch,
                false_branch,
                ..
            } => true_branch.leaf_count() + false_branch.leaf_count(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BinaryNode::Leaf(_) => 0,
            BinaryNode::Split {
                true_branch,
                false_branch,
                ..
            } => 1 + true_branch.depth().max(false_branch.depth()),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            BinaryNode::Leaf(counts) => writeln!(f, "{:indent$}=> {}", "", counts, indent = indent),
            BinaryNode::Split {
                test,
                true_branch,
                false_branch,
            } => {
                writeln!(f, "{:indent$}{}?", "", test, indent = indent)?;
                writeln!(f, "{:indent$}true:", "", indent = indent)?;
                true_branch.fmt_indented(f, indent + 2)?;
                writeln!(f, "{:indent$}false:", "", indent = indent)?;
                false_branch.fmt_indented(f, indent + 2)
            }
        }
    }
}

impl fmt::Display for BinaryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Binary decision tree built with CART over equality tests.
#[derive(Clone, Debug, Default)]
pub struct CartClassifier {
    root: Option<BinaryNode>,
}

impl CartClassifier {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&BinaryNode> {
        self.root.as_ref()
    }
}

impl Classifier for CartClassifier {
    #[instrument(skip_all, fields(rows = learn.len()))]
    fn fit(&mut self, learn: &Dataset) -> Result<(), TreeError> {
        let rows = learn.rows().iter().collect::<Vec<_>>();
        let root = induce(&rows, learn.header())?;
        debug!(
            leaves = root.leaf_count(),
            depth = root.depth(),
            "induced CART tree"
        );
        self.root = Some(root);
        Ok(())
    }

    /// Majority class of the leaf the row descends to.
    fn predict_one(&self, example: &Example) -> Result<Option<String>, TreeError> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        Ok(predict(classify(example, root)).map(str::to_string))
    }

    fn describe(&self) -> Option<String> {
        self.root.as_ref().map(ToString::to_string)
    }
}

/// Induces a binary tree from `rows`, testing every attribute column of `header`.
///
/// # Errors
///
/// Returns [`TreeError::EmptyDataset`] if `rows` is empty.
pub fn induce(rows: &[&Example], header: &Header) -> Result<BinaryNode, TreeError> {
    if rows.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    Ok(build_tree(rows, header))
}

fn build_tree(rows: &[&Example], header: &Header) -> BinaryNode {
    let Some(best_split) = get_best_split(rows, header) else {
        return BinaryNode::Leaf(ClassCounts::from_rows(
            rows.iter().copied(),
            header.target_index(),
        ));
    };

    debug!(
        test = %best_split.test,
        gain = best_split.information_gain,
        rows = rows.len(),
        "splitting"
    );
    let true_branch = build_tree(&best_split.true_rows, header);
    let false_branch = build_tree(&best_split.false_rows, header);
    BinaryNode::Split {
        test: best_split.test,
        true_branch: Box::new(true_branch),
        false_branch: Box::new(false_branch),
    }
}

struct SplitData<'r> {
    test: SplitTest,
    true_rows: Vec<&'r Example>,
    false_rows: Vec<&'r Example>,
    information_gain: f64,
}

/// The test with the greatest impurity reduction above [`MIN_GAIN`], first found on ties.
///
/// Candidates leaving either side empty are skipped. `None` means no test improves purity.
fn get_best_split<'r>(rows: &[&'r Example], header: &Header) -> Option<SplitData<'r>> {
    let target = header.target_index();
    let current_uncertainty = ClassCounts::from_rows(rows.iter().copied(), target).gini();
    let mut best_split: Option<SplitData<'r>> = None;
    let mut best_information_gain = 0.0;

    for column in header.attribute_indices() {
        for value in unique_values(rows, column) {
            let test = SplitTest::new(header, column, value);
            let (true_rows, false_rows): (Vec<&'r Example>, Vec<&'r Example>) =
                rows.iter().partition(|row| test.matches(row));

            if true_rows.is_empty() || false_rows.is_empty() {
                continue;
            }

            let current_information_gain =
                information_gain(&true_rows, &false_rows, current_uncertainty, target);
            if current_information_gain > best_information_gain + MIN_GAIN {
                best_information_gain = current_information_gain;
                best_split = Some(SplitData {
                    test,
                    true_rows,
                    false_rows,
                    information_gain: current_information_gain,
                });
            }
        }
    }
    best_split
}

/// `gini(parent) - p·gini(true) - (1 - p)·gini(false)` with `p = |true| / |parent|`.
pub fn information_gain(
    true_rows: &[&Example],
    false_rows: &[&Example],
    current_uncertainty: f64,
    target: usize,
) -> f64 {
    let p = true_rows.len() as f64 / (true_rows.len() + false_rows.len()) as f64;
    current_uncertainty
        - p * ClassCounts::from_rows(true_rows.iter().copied(), target).gini()
        - (1.0 - p) * ClassCounts::from_rows(false_rows.iter().copied(), target).gini()
}

fn unique_values<'r>(rows: &[&'r Example], column: usize) -> Vec<&'r str> {
    let mut values: Vec<&'r str> = Vec::new();
    for row in rows {
        let value = row.value(column);
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// Descends from `node` to a leaf and returns the leaf's class frequencies.
pub fn classify<'t>(example: &Example, node: &'t BinaryNode) -> &'t ClassCounts {
    match node {
        BinaryNode::Leaf(counts) => counts,
        BinaryNode::Split {
            test,
            true_branch,
            false_branch,
        } => {
            if test.matches(example) {
                classify(example, true_branch)
            } else {
                classify(example, false_branch)
            }
        }
    }
}

/// Most frequent class of a leaf; ties go to the class that was counted first.
pub fn predict(leaf: &ClassCounts) -> Option<&str> {
    leaf.majority()
}
