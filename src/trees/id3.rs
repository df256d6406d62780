//! ID3 Decision Tree Classifier
use crate::data::dataset::{Dataset, Example, Header};
use crate::error::TreeError;
use crate::trees::classifier::Classifier;
use crate::trees::counts::{ClassCounts, MIN_GAIN};
use crate::trees::node::Node;
use crate::trees::params::{BranchValues, Id3Params};
use crate::trees::rules::{self, Rule};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Values of each attribute column, in first-encounter order.
type ValueDomain = HashMap<usize, Vec<String>>;

/// Multiway decision tree built with ID3, predicting through its rule set.
#[derive(Clone, Debug, Default)]
pub struct Id3Classifier {
    root: Option<Node>,
    rules: Vec<Rule>,
    header: Option<Header>,
    params: Id3Params,
}

impl Id3Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: Id3Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Rules of the current tree, one per leaf, in extraction order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Classifier for Id3Classifier {
    #[instrument(skip_all, fields(rows = learn.len()))]
    fn fit(&mut self, learn: &Dataset) -> Result<(), TreeError> {
        let rows = learn.rows().iter().collect::<Vec<_>>();
        let header = learn.header();
        let attributes = learn.attributes();

        let root = match self.params.branch_values() {
            BranchValues::Observed => induce(&rows, &attributes, header)?,
            BranchValues::Domain => {
                let indices = resolve_attributes(&attributes, header)?;
                if rows.is_empty() {
                    return Err(TreeError::EmptyDataset);
                }
                let domain = value_domain(&rows, &indices);
                grow(&rows, indices, header, Some(&domain))
            }
        };

        self.rules = rules::extract_rules(&root);
        debug!(
            leaves = root.leaf_count(),
            depth = root.depth(),
            rules = self.rules.len(),
            "induced ID3 tree"
        );
        self.root = Some(root);
        self.header = Some(header.clone());
        Ok(())
    }

    /// Class of the first rule the row satisfies; `None` when no rule does.
    fn predict_one(&self, example: &Example) -> Result<Option<String>, TreeError> {
        let header = self.header.as_ref().ok_or(TreeError::NotFitted)?;
        Ok(rules::classify(&self.rules, example, header).map(str::to_string))
    }

    fn describe(&self) -> Option<String> {
        self.root.as_ref().map(ToString::to_string)
    }
}

/// Induces a multiway tree from `learn_set`, splitting only on `attributes`.
///
/// Each node branches on the values observed in the rows that reach it.
///
/// # Errors
///
/// Returns [`TreeError::EmptyDataset`] for an empty learn set and
/// [`TreeError::UnknownAttribute`] if an attribute is not a splitting column of `header`.
pub fn induce(
    learn_set: &[&Example],
    attributes: &[String],
    header: &Header,
) -> Result<Node, TreeError> {
    let indices = resolve_attributes(attributes, header)?;
    if learn_set.is_empty() {
        return Err(TreeError::EmptyDataset);
    }
    Ok(grow(learn_set, indices, header, None))
}

fn resolve_attributes(attributes: &[String], header: &Header) -> Result<Vec<usize>, TreeError> {
    attributes
        .iter()
        .map(|attribute| {
            header
                .index_of(attribute)
                .filter(|&index| header.is_attribute(index))
                .ok_or_else(|| TreeError::UnknownAttribute {
                    attribute: attribute.clone(),
                })
        })
        .collect()
}

fn value_domain(rows: &[&Example], attributes: &[usize]) -> ValueDomain {
    attributes
        .iter()
        .map(|&attribute| {
            let values = partition(rows, attribute)
                .into_iter()
                .map(|(value, _)| value.to_string())
                .collect();
            (attribute, values)
        })
        .collect()
}

/// Builds the subtree for a non-empty `learn_set`.
///
/// `attributes` is owned by this call, so removing the chosen attribute
/// never affects sibling branches.
fn grow(
    learn_set: &[&Example],
    attributes: Vec<usize>,
    header: &Header,
    domain: Option<&ValueDomain>,
) -> Node {
    let counts = ClassCounts::from_rows(learn_set.iter().copied(), header.target_index());
    let majority = counts.majority().unwrap_or_default();

    if counts.is_pure() || attributes.is_empty() {
        return Node::leaf(majority);
    }

    let Some(best) = best_attribute(learn_set, &attributes, &counts, header) else {
        return Node::leaf(majority);
    };
    let remaining = attributes
        .into_iter()
        .filter(|&attribute| attribute != best)
        .collect::<Vec<_>>();

    let mut partitions = partition(learn_set, best);
    if let Some(values) = domain.and_then(|domain| domain.get(&best)) {
        let mut by_domain = Vec::with_capacity(values.len());
        for value in values {
            match partitions.iter().position(|(seen, _)| *seen == value.as_str()) {
                Some(position) => by_domain.push(partitions.swap_remove(position)),
                None => {
                    debug!(
                        attribute = header.column_name(best),
                        %value,
                        "empty partition, falling back to majority"
                    );
                    return Node::leaf(majority);
                }
            }
        }
        partitions = by_domain;
    }

    debug!(
        attribute = header.column_name(best),
        branches = partitions.len(),
        rows = learn_set.len(),
        "splitting"
    );
    let mut node = Node::split(header.column_name(best));
    for (value, rows) in partitions {
        let child = grow(&rows, remaining.clone(), header, domain);
        node.add_branch(value, child);
    }
    node
}

/// Attribute with the greatest information gain; the earliest one wins a tie.
fn best_attribute(
    learn_set: &[&Example],
    attributes: &[usize],
    counts: &ClassCounts,
    header: &Header,
) -> Option<usize> {
    let entropy = counts.entropy();
    let mut best = None;
    let mut best_information_gain = f64::NEG_INFINITY;

    for &attribute in attributes {
        let current_information_gain = information_gain(learn_set, attribute, entropy, header);
        if current_information_gain > best_information_gain + MIN_GAIN {
            best = Some(attribute);
            best_information_gain = current_information_gain;
        }
    }
    best
}

/// `entropy(S) - Σ_v |S_v| / |S| · entropy(S_v)` for the partition of `S` on `attribute`.
pub fn information_gain(
    learn_set: &[&Example],
    attribute: usize,
    entropy: f64,
    header: &Header,
) -> f64 {
    let total = learn_set.len() as f64;
    let remainder: f64 = partition(learn_set, attribute)
        .iter()
        .map(|(_, rows)| {
            let counts = ClassCounts::from_rows(rows.iter().copied(), header.target_index());
            rows.len() as f64 / total * counts.entropy()
        })
        .sum();
    entropy - remainder
}

/// Groups rows by their value of `attribute`, in first-encounter order.
fn partition<'r>(
    rows: &[&'r Example],
    attribute: usize,
) -> Vec<(&'r str, Vec<&'r Example>)> {
    let mut partitions: Vec<(&'r str, Vec<&'r Example>)> = Vec::new();
    for &row in rows {
        let value = row.value(attribute);
        match partitions.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, group)) => group.push(row),
            None => partitions.push((value, vec![row])),
        }
    }
    partitions
}
