use crate::data::dataset::SplitPolicy;
use crate::error::TreeError;
use crate::trees::classifier::Algorithm;
use crate::trees::params::Id3Params;

/// Which trials keep their test set and predictions in the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeepPredictions {
    #[default]
    Never,
    LastTrial,
    EveryTrial,
}

impl KeepPredictions {
    /// Whether trial number `trial` out of `trials` keeps its predictions.
    pub fn keeps(&self, trial: usize, trials: usize) -> bool {
        match self {
            KeepPredictions::Never => false,
            KeepPredictions::LastTrial => trial + 1 == trials,
            KeepPredictions::EveryTrial => true,
        }
    }
}

/// Settings of a repeated train/test evaluation.
///
/// | Parameter          | Default       |
/// |--------------------|---------------|
/// | `trials`           | 1             |
/// | `algorithm`        | `Id3`         |
/// | `split_policy`     | `Ratio(0.5)`  |
/// | `seed`             | `None`        |
/// | `parallel`         | `false`       |
/// | `keep_predictions` | `Never`       |
#[derive(Clone, Debug)]
pub struct EvaluationConfig {
    trials: usize,
    algorithm: Algorithm,
    id3_params: Id3Params,
    split_policy: SplitPolicy,
    seed: Option<u64>,
    parallel: bool,
    keep_predictions: KeepPredictions,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationConfig {
    pub fn new() -> Self {
        Self {
            trials: 1,
            algorithm: Algorithm::Id3,
            id3_params: Id3Params::new(),
            split_policy: SplitPolicy::default(),
            seed: None,
            parallel: false,
            keep_predictions: KeepPredictions::Never,
        }
    }

    /// Sets the number of independent trials.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidTrialCount`] if `trials` is zero.
    pub fn set_trials(&mut self, trials: usize) -> Result<(), TreeError> {
        if trials < 1 {
            return Err(TreeError::InvalidTrialCount);
        }
        self.trials = trials;
        Ok(())
    }

    /// Sets how each trial divides the data.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidTrainRatio`] for a ratio outside (0, 1).
    pub fn set_split_policy(&mut self, split_policy: SplitPolicy) -> Result<(), TreeError> {
        split_policy.validate()?;
        self.split_policy = split_policy;
        Ok(())
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn set_id3_params(&mut self, id3_params: Id3Params) {
        self.id3_params = id3_params;
    }

    /// Base seed; trial `i` draws its split from `seed + i`. `None` seeds every trial from entropy.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Runs the trials on the rayon thread pool instead of one after another.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Chooses which trials keep their test set and predictions in their result.
    pub fn set_keep_predictions(&mut self, keep_predictions: KeepPredictions) {
        self.keep_predictions = keep_predictions;
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn id3_params(&self) -> &Id3Params {
        &self.id3_params
    }

    pub fn split_policy(&self) -> SplitPolicy {
        self.split_policy
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn keep_predictions(&self) -> KeepPredictions {
        self.keep_predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluationConfig::new();
        assert_eq!(config.trials(), 1);
        assert_eq!(config.algorithm(), Algorithm::Id3);
        assert_eq!(config.split_policy(), SplitPolicy::Ratio(0.5));
        assert_eq!(config.seed(), None);
        assert!(!config.parallel());
        assert_eq!(config.keep_predictions(), KeepPredictions::Never);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let mut config = EvaluationConfig::new();
        assert!(matches!(config.set_trials(0), Err(TreeError::InvalidTrialCount)));
        assert!(config.set_trials(50).is_ok());
        assert_eq!(config.trials(), 50);
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let mut config = EvaluationConfig::new();
        assert!(config.set_split_policy(SplitPolicy::Ratio(1.0)).is_err());
        assert!(config.set_split_policy(SplitPolicy::CoinToss).is_ok());
        assert_eq!(config.split_policy(), SplitPolicy::CoinToss);
    }

    #[test]
    fn test_keep_predictions_selects_trials() {
        assert!(!KeepPredictions::Never.keeps(4, 5));
        assert!(KeepPredictions::LastTrial.keeps(4, 5));
        assert!(!KeepPredictions::LastTrial.keeps(3, 5));
        assert!(KeepPredictions::EveryTrial.keeps(0, 5));
    }
}
