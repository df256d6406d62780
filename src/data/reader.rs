use crate::data::dataset::{Dataset, Example, Header};
use crate::error::TreeError;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument};

/// Reads a cleaned, headed CSV file into a [`Dataset`].
///
/// Every column other than the target and the identifier columns is taken
/// as a categorical splitting attribute; values are kept verbatim.
#[derive(Clone, Debug)]
pub struct DatasetReader {
    target: String,
    identifiers: Vec<String>,
    delimiter: u8,
}

impl DatasetReader {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            identifiers: Vec::new(),
            delimiter: b',',
        }
    }

    /// Marks a column as a row identifier that is never split on.
    #[must_use]
    pub fn with_identifier(mut self, column: &str) -> Self {
        self.identifiers.push(column.to_string());
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Opens and reads a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Io`] if the file cannot be opened, otherwise the
    /// same errors as [`DatasetReader::from_reader`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Dataset, TreeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.from_reader(file)
    }

    /// Reads CSV data from any reader. The first record is the header.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::MissingTarget`] | target column not in the header |
    /// | [`TreeError::MissingIdentifier`] | an identifier column not in the header |
    /// | [`TreeError::Csv`] | malformed input, including rows of the wrong length |
    /// | [`TreeError::EmptyDataset`] | the header is followed by zero rows |
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Dataset, TreeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(|column| column.trim_start_matches('\u{feff}').to_string())
            .collect::<Vec<_>>();
        let identifiers = self.identifiers.iter().map(String::as_str).collect::<Vec<_>>();
        let header = Header::new(columns, &self.target, &identifiers)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(Example::new(record.iter().map(str::to_string).collect()));
        }

        if rows.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        info!(
            rows = rows.len(),
            attributes = header.attribute_indices().len(),
            target = %header.target_name(),
            "loaded dataset"
        );
        Dataset::new(header, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES: &str = "\
title,revenue,release,prod_budget,genre,company
Heat,2,12,1,Action,Other
Fargo,0,3,0,Drama,Empty
Up,4,5,3,Animation,Disney
";

    #[test]
    fn test_read_movies() {
        let dataset = DatasetReader::new("revenue")
            .with_identifier("title")
            .from_reader(MOVIES.as_bytes())
            .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.attributes(),
            vec!["release", "prod_budget", "genre", "company"]
        );
        assert_eq!(dataset.target_values().collect::<Vec<_>>(), vec!["2", "0", "4"]);
    }

    #[test]
    fn test_missing_target() {
        let result = DatasetReader::new("profit").from_reader(MOVIES.as_bytes());
        assert!(matches!(result, Err(TreeError::MissingTarget { column }) if column == "profit"));
    }

    #[test]
    fn test_missing_identifier() {
        let result = DatasetReader::new("revenue")
            .with_identifier("name")
            .from_reader(MOVIES.as_bytes());
        assert!(matches!(result, Err(TreeError::MissingIdentifier { .. })));
    }

    #[test]
    fn test_empty_dataset() {
        let result = DatasetReader::new("revenue").from_reader("title,revenue\n".as_bytes());
        assert!(matches!(result, Err(TreeError::EmptyDataset)));
    }

    #[test]
    fn test_ragged_row() {
        let result =
            DatasetReader::new("revenue").from_reader("genre,revenue\nAction,1\nDrama\n".as_bytes());
        assert!(matches!(result, Err(TreeError::Csv(_))));
    }

    #[test]
    fn test_byte_order_mark_and_delimiter() {
        let dataset = DatasetReader::new("revenue")
            .with_delimiter(b';')
            .from_reader("\u{feff}genre;revenue\nAction;1\n".as_bytes())
            .unwrap();
        assert_eq!(dataset.header().columns(), &["genre", "revenue"]);
    }

    #[test]
    fn test_missing_file() {
        let result = DatasetReader::new("revenue").from_path("does/not/exist.csv");
        assert!(matches!(result, Err(TreeError::Io { .. })));
    }
}
