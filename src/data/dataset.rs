use crate::error::TreeError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::{self, Debug, Formatter};
use tracing::debug;

/// Column context shared by every row of a dataset.
///
/// Resolves column names to positions and remembers which column is the
/// target and which columns only identify a row (e.g. a title) and must
/// never be split on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    target: usize,
    identifiers: Vec<usize>,
}

impl Header {
    /// Creates a header from column names, the target column and the identifier columns.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::MissingTarget`] if `target` is not one of `columns`, and
    /// [`TreeError::MissingIdentifier`] if any identifier is not one of `columns`.
    pub fn new(columns: Vec<String>, target: &str, identifiers: &[&str]) -> Result<Self, TreeError> {
        let target_index = columns
            .iter()
            .position(|column| column == target)
            .ok_or_else(|| TreeError::MissingTarget {
                column: target.to_string(),
            })?;

        let identifiers = identifiers
            .iter()
            .map(|&name| {
                columns
                    .iter()
                    .position(|column| column == name)
                    .ok_or_else(|| TreeError::MissingIdentifier {
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns,
            target: target_index,
            identifiers,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column_name(&self, index: usize) -> &str {
        &self.columns[index]
    }

    pub fn target_index(&self) -> usize {
        self.target
    }

    pub fn target_name(&self) -> &str {
        &self.columns[self.target]
    }

    pub fn is_identifier(&self, index: usize) -> bool {
        self.identifiers.contains(&index)
    }

    /// Returns `true` if the column may be used as a splitting attribute.
    pub fn is_attribute(&self, index: usize) -> bool {
        index != self.target && !self.is_identifier(index)
    }

    /// Positions of the splitting attributes, in header order.
    pub fn attribute_indices(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&index| self.is_attribute(index))
            .collect()
    }

    /// Names of the splitting attributes, in header order.
    pub fn attributes(&self) -> Vec<String> {
        self.attribute_indices()
            .into_iter()
            .map(|index| self.columns[index].clone())
            .collect()
    }
}

/// A single cleaned row of categorical values, stored in header order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Example {
    values: Vec<String>,
}

impl Example {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value at a column position.
    ///
    /// Rows of a [`Dataset`] always match its header, so an out-of-range
    /// index is a caller bug and panics.
    pub fn value(&self, index: usize) -> &str {
        &self.values[index]
    }

    /// Value of a named column, if the header has it.
    pub fn get(&self, header: &Header, name: &str) -> Option<&str> {
        header.index_of(name).map(|index| self.value(index))
    }

    pub fn target<'a>(&'a self, header: &Header) -> &'a str {
        self.value(header.target_index())
    }
}

/// How a dataset is divided into a learn set and a test set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitPolicy {
    /// Every row independently goes to either side with probability 1/2.
    CoinToss,
    /// Shuffle all rows, then the first `floor(ratio * len)` rows form the learn set.
    Ratio(f64),
}

impl Default for SplitPolicy {
    fn default() -> Self {
        SplitPolicy::Ratio(0.5)
    }
}

impl SplitPolicy {
    /// Checks that a ratio policy has its ratio strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), TreeError> {
        match *self {
            SplitPolicy::Ratio(ratio) if !(ratio > 0.0 && ratio < 1.0) => {
                Err(TreeError::InvalidTrainRatio { ratio })
            }
            _ => Ok(()),
        }
    }
}

/// Rows of cleaned examples together with their column context.
#[derive(Clone, PartialEq)]
pub struct Dataset {
    header: Header,
    rows: Vec<Example>,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    columns: {:?},\n    rows: [\n", self.header.columns)?;
        for row in &self.rows {
            writeln!(f, "        {:?},", row.values)?;
        }
        write!(f, "    ]\n}}")
    }
}

impl Dataset {
    /// Creates a dataset, checking that every row matches the header.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RowLengthMismatch`] for the first row whose arity
    /// differs from the header.
    pub fn new(header: Header, rows: Vec<Example>) -> Result<Self, TreeError> {
        if let Some((row, example)) = rows
            .iter()
            .enumerate()
            .find(|(_, example)| example.values.len() != header.len())
        {
            return Err(TreeError::RowLengthMismatch {
                row,
                expected: header.len(),
                got: example.values.len(),
            });
        }
        Ok(Self { header, rows })
    }

    /// Builds a dataset from string records, mostly useful in tests and small drivers.
    pub fn from_records(
        columns: &[&str],
        target: &str,
        identifiers: &[&str],
        records: &[Vec<&str>],
    ) -> Result<Self, TreeError> {
        let header = Header::new(
            columns.iter().map(|column| column.to_string()).collect(),
            target,
            identifiers,
        )?;
        let rows = records
            .iter()
            .map(|record| Example::new(record.iter().map(|value| value.to_string()).collect()))
            .collect();
        Self::new(header, rows)
    }

    /// A dataset with the same header and a different set of rows.
    pub fn with_rows(&self, rows: Vec<Example>) -> Self {
        Self {
            header: self.header.clone(),
            rows,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn rows(&self) -> &[Example] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn attributes(&self) -> Vec<String> {
        self.header.attributes()
    }

    pub fn target_values(&self) -> impl Iterator<Item = &str> {
        let target = self.header.target_index();
        self.rows.iter().map(move |row| row.value(target))
    }

    /// Divides the rows into a disjoint, exhaustive (learn, test) pair.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidTrainRatio`] for a ratio outside (0, 1).
    pub fn split<R: Rng + ?Sized>(
        &self,
        policy: SplitPolicy,
        rng: &mut R,
    ) -> Result<(Self, Self), TreeError> {
        policy.validate()?;

        let (learn, test) = match policy {
            SplitPolicy::CoinToss => self
                .rows
                .iter()
                .cloned()
                .partition::<Vec<_>, _>(|_| rng.gen_bool(0.5)),
            SplitPolicy::Ratio(ratio) => {
                let mut indices = (0..self.rows.len()).collect::<Vec<_>>();
                indices.shuffle(rng);
                let learn_size = (self.rows.len() as f64 * ratio).floor() as usize;
                let learn = indices[..learn_size]
                    .iter()
                    .map(|&index| self.rows[index].clone())
                    .collect::<Vec<_>>();
                let test = indices[learn_size..]
                    .iter()
                    .map(|&index| self.rows[index].clone())
                    .collect::<Vec<_>>();
                (learn, test)
            }
        };

        debug!(
            ?policy,
            learn = learn.len(),
            test = test.len(),
            "split dataset"
        );
        Ok((self.with_rows(learn), self.with_rows(test)))
    }
}
