/// Rows, column context and learn/test splitting
pub mod dataset;
/// Writing test rows together with their predictions
pub mod predictions;
/// Loading cleaned CSV files
pub mod reader;
