/// Confusion matrix, accuracy, precision and recall over class labels
pub mod confusion;
