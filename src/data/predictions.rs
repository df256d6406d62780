use crate::data::dataset::Dataset;
use crate::error::TreeError;
use csv::WriterBuilder;
use std::io::Write;

/// Header of the column appended to every written row.
pub const PREDICTION_COLUMN: &str = "Prediction";

/// Writes every test row followed by its prediction as CSV.
///
/// Rows that received no prediction get an empty `Prediction` field.
///
/// # Errors
///
/// Returns [`TreeError::PredictionCountMismatch`] unless there is exactly one
/// prediction per test row, and [`TreeError::Csv`] if writing fails.
pub fn write_predictions<W: Write>(
    writer: W,
    test: &Dataset,
    predictions: &[Option<String>],
) -> Result<(), TreeError> {
    if predictions.len() != test.len() {
        return Err(TreeError::PredictionCountMismatch {
            rows: test.len(),
            predictions: predictions.len(),
        });
    }
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(
        test.header()
            .columns()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(PREDICTION_COLUMN)),
    )?;

    for (row, prediction) in test.rows().iter().zip(predictions) {
        writer.write_record(
            row.values()
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(prediction.as_deref().unwrap_or(""))),
        )?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
