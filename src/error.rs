use std::path::PathBuf;

/// Errors from loading data, inducing trees and evaluating them.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when a dataset has zero rows.
    #[error("dataset has zero rows")]
    EmptyDataset,

    /// Returned when the target column is not part of the header.
    #[error("target column '{column}' is missing from the header")]
    MissingTarget {
        /// The target column that was asked for.
        column: String,
    },

    /// Returned when a declared identifier column is not part of the header.
    #[error("identifier column '{column}' is missing from the header")]
    MissingIdentifier {
        /// The identifier column that was asked for.
        column: String,
    },

    /// Returned when a splitting attribute is not a non-target, non-identifier column.
    #[error("'{attribute}' is not a splitting attribute of this dataset")]
    UnknownAttribute {
        /// The attribute that was asked for.
        attribute: String,
    },

    /// Returned when a record has a different number of fields than the header.
    #[error("row {row} has {got} fields, expected {expected}")]
    RowLengthMismatch {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of fields in the row.
        got: usize,
    },

    /// Returned when the CSV input cannot be parsed.
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// Returned when a file cannot be opened or created.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a train ratio is not strictly between 0 and 1.
    #[error("train ratio must be in (0.0, 1.0), got {ratio}")]
    InvalidTrainRatio {
        /// The invalid ratio.
        ratio: f64,
    },

    /// Returned when an evaluation is asked to run zero trials.
    #[error("number of trials must be at least 1")]
    InvalidTrialCount,

    /// Returned when a test set and its predictions differ in length.
    #[error("{rows} test rows but {predictions} predictions")]
    PredictionCountMismatch {
        /// Number of test rows.
        rows: usize,
        /// Number of predictions.
        predictions: usize,
    },

    /// Returned when accuracy is requested over an empty test set.
    #[error("test set is empty, accuracy is undefined")]
    EmptyTestSet,

    /// Returned when every trial of an evaluation had an empty learn or test set.
    #[error("none of the {trials} trials had non-empty learn and test sets")]
    NoScoredTrials {
        /// Number of trials that were run.
        trials: usize,
    },

    /// Returned when a classifier is used before it was fitted.
    #[error("classifier has not been fitted yet")]
    NotFitted,
}
