/// Trial loop, accuracy and reports
pub mod harness;
/// Evaluation settings
pub mod params;
