//! Repeated train/test evaluation of the tree classifiers
use crate::data::dataset::Dataset;
use crate::error::TreeError;
use crate::evaluation::params::EvaluationConfig;
use crate::metrics::confusion::ConfusionMatrix;
use crate::trees::classifier::{Algorithm, Classifier};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

/// A test set together with what a classifier predicted for each of its rows.
#[derive(Clone, Debug)]
pub struct Predictions {
    pub test: Dataset,
    pub predicted: Vec<Option<String>>,
}

/// Outcome of one trial.
#[derive(Clone, Debug)]
pub struct TrialResult {
    pub trial: usize,
    pub learn_size: usize,
    pub test_size: usize,
    /// `None` when the trial was skipped because a partition came out empty.
    pub confusion: Option<ConfusionMatrix>,
    pub predictions: Option<Predictions>,
}

impl TrialResult {
    pub fn is_scored(&self) -> bool {
        self.confusion.is_some()
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.confusion.as_ref().map(ConfusionMatrix::accuracy)
    }

    pub fn correct(&self) -> usize {
        self.confusion.as_ref().map_or(0, ConfusionMatrix::correct)
    }
}

/// Results of every trial and their mean accuracy.
#[derive(Clone, Debug)]
pub struct EvaluationReport {
    pub algorithm: Algorithm,
    pub trials: Vec<TrialResult>,
    /// Arithmetic mean of the accuracies of the scored trials.
    pub mean_accuracy: f64,
}

impl EvaluationReport {
    pub fn scored_trials(&self) -> usize {
        self.trials.iter().filter(|trial| trial.is_scored()).count()
    }
}

/// Accuracy of `model` over `test`, with rows the model has no answer for counted as wrong.
///
/// # Errors
///
/// Returns [`TreeError::EmptyTestSet`] if `test` has no rows, and
/// [`TreeError::NotFitted`] if the model has not been fitted.
pub fn evaluate<C: Classifier + ?Sized>(model: &C, test: &Dataset) -> Result<f64, TreeError> {
    let predictions = model.predict(test)?;
    Ok(confusion_matrix(test, &predictions)?.accuracy())
}

fn confusion_matrix(
    test: &Dataset,
    predictions: &[Option<String>],
) -> Result<ConfusionMatrix, TreeError> {
    let y_true = test.target_values().collect::<Vec<_>>();
    ConfusionMatrix::new(&y_true, predictions)
}

/// Runs `trials` independent split/induce/score rounds over one dataset.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    config: EvaluationConfig,
}

impl Evaluation {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Runs every trial and averages the accuracy of those that could be scored.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::EmptyDataset`] | `dataset` has no rows |
    /// | [`TreeError::InvalidTrialCount`] | zero trials configured |
    /// | [`TreeError::NoScoredTrials`] | every trial had an empty learn or test set |
    /// | Other errors | From splitting or fitting |
    #[instrument(skip_all, fields(
        algorithm = %self.config.algorithm(),
        trials = self.config.trials(),
        rows = dataset.len()
    ))]
    pub fn run(&self, dataset: &Dataset) -> Result<EvaluationReport, TreeError> {
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let n = self.config.trials();
        if n < 1 {
            return Err(TreeError::InvalidTrialCount);
        }

        let trials = if self.config.parallel() {
            (0..n)
                .into_par_iter()
                .map(|trial| self.run_trial(dataset, trial))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..n)
                .map(|trial| self.run_trial(dataset, trial))
                .collect::<Result<Vec<_>, _>>()?
        };

        let accuracies = trials
            .iter()
            .filter_map(TrialResult::accuracy)
            .collect::<Vec<_>>();
        if accuracies.is_empty() {
            return Err(TreeError::NoScoredTrials { trials: n });
        }
        let mean_accuracy = accuracies.iter().sum::<f64>() / accuracies.len() as f64;

        info!(
            scored = accuracies.len(),
            mean_accuracy, "evaluation finished"
        );
        Ok(EvaluationReport {
            algorithm: self.config.algorithm(),
            trials,
            mean_accuracy,
        })
    }

    /// Splits, induces a fresh tree and scores it for trial number `trial`.
    ///
    /// A trial whose learn or test set comes out empty is returned unscored.
    pub fn run_trial(&self, dataset: &Dataset, trial: usize) -> Result<TrialResult, TreeError> {
        let mut rng = match self.config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(trial as u64)),
            None => StdRng::from_entropy(),
        };
        let (learn, test) = dataset.split(self.config.split_policy(), &mut rng)?;

        let mut result = TrialResult {
            trial,
            learn_size: learn.len(),
            test_size: test.len(),
            confusion: None,
            predictions: None,
        };
        if learn.is_empty() || test.is_empty() {
            warn!(
                trial,
                learn = learn.len(),
                test = test.len(),
                "empty partition, skipping trial"
            );
            return Ok(result);
        }

        let mut classifier = self.config.algorithm().classifier(self.config.id3_params());
        classifier.fit(&learn)?;
        let predicted = classifier.predict(&test)?;
        let confusion = confusion_matrix(&test, &predicted)?;

        info!(
            trial,
            accuracy = confusion.accuracy(),
            precision = confusion.precision(),
            recall = confusion.recall(),
            unmatched = confusion.unmatched(),
            "trial finished"
        );
        result.confusion = Some(confusion);
        if self.config.keep_predictions().keeps(trial, self.config.trials()) {
            result.predictions = Some(Predictions { test, predicted });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::SplitPolicy;
    use crate::evaluation::params::KeepPredictions;
    use crate::trees::id3::Id3Classifier;
    use approx::assert_relative_eq;

    /// Revenue is fully determined by genre and company.
    fn movies(copies: usize) -> Dataset {
        let base = [
            ["Action", "Disney", "3"],
            ["Action", "Other", "1"],
            ["Drama", "Disney", "0"],
            ["Drama", "Other", "0"],
            ["Comedy", "Disney", "2"],
            ["Comedy", "Other", "1"],
        ];
        let titles = (0..copies * base.len())
            .map(|i| format!("movie-{i}"))
            .collect::<Vec<_>>();
        let records = titles
            .iter()
            .zip(base.iter().cycle())
            .map(|(title, row)| vec![title.as_str(), row[0], row[1], row[2]])
            .collect::<Vec<_>>();
        Dataset::from_records(
            &["title", "genre", "company", "revenue"],
            "revenue",
            &["title"],
            &records,
        )
        .unwrap()
    }

    fn config(algorithm: Algorithm, trials: usize) -> EvaluationConfig {
        let mut config = EvaluationConfig::new().with_algorithm(algorithm).with_seed(42);
        config.set_trials(trials).unwrap();
        config
    }

    #[test]
    fn test_evaluate() {
        let data = movies(2);
        let mut classifier = Id3Classifier::new();
        classifier.fit(&data).unwrap();
        assert_relative_eq!(evaluate(&classifier, &data).unwrap(), 1.0);
    }

    #[test]
    fn test_evaluate_empty_test_set() {
        let data = movies(1);
        let mut classifier = Id3Classifier::new();
        classifier.fit(&data).unwrap();
        let empty = data.with_rows(Vec::new());
        assert!(matches!(
            evaluate(&classifier, &empty),
            Err(TreeError::EmptyTestSet)
        ));
    }

    #[test]
    fn test_learnable_data_scores_perfectly() {
        for algorithm in [Algorithm::Id3, Algorithm::Cart] {
            let report = Evaluation::new(config(algorithm, 5)).run(&movies(10)).unwrap();
            assert_eq!(report.trials.len(), 5);
            assert_eq!(report.scored_trials(), 5);
            for trial in &report.trials {
                assert_eq!(trial.learn_size, 30);
                assert_eq!(trial.test_size, 30);
            }
            // 30 rows drawn from 6 patterns almost surely cover all of them
            assert!(report.mean_accuracy > 0.9, "{algorithm}: {}", report.mean_accuracy);
        }
    }

    #[test]
    fn test_mean_is_average_of_trials() {
        let report = Evaluation::new(config(Algorithm::Cart, 4)).run(&movies(3)).unwrap();
        let sum: f64 = report.trials.iter().filter_map(TrialResult::accuracy).sum();
        assert_relative_eq!(report.mean_accuracy, sum / report.scored_trials() as f64);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = movies(4);
        let mut sequential = config(Algorithm::Id3, 6);
        sequential.set_split_policy(SplitPolicy::CoinToss).unwrap();
        let mut parallel = sequential.clone();
        parallel.set_parallel(true);

        let a = Evaluation::new(sequential).run(&data).unwrap();
        let b = Evaluation::new(parallel).run(&data).unwrap();
        assert_eq!(
            a.trials.iter().map(TrialResult::correct).collect::<Vec<_>>(),
            b.trials.iter().map(TrialResult::correct).collect::<Vec<_>>()
        );
        assert_relative_eq!(a.mean_accuracy, b.mean_accuracy);
    }

    #[test]
    fn test_single_row_trials_are_skipped() {
        let data = movies(1).with_rows(movies(1).rows()[..1].to_vec());
        let mut config = config(Algorithm::Id3, 3);
        config.set_split_policy(SplitPolicy::Ratio(0.5)).unwrap();

        // one row and a 0.5 ratio always leaves the learn set empty
        let result = Evaluation::new(config).run(&data);
        assert!(matches!(result, Err(TreeError::NoScoredTrials { trials: 3 })));
    }

    #[test]
    fn test_empty_test_sets_are_left_out_of_the_mean() {
        let data = movies(1).with_rows(movies(1).rows()[..3].to_vec());
        let mut config = config(Algorithm::Id3, 60);
        config.set_split_policy(SplitPolicy::CoinToss).unwrap();

        let report = Evaluation::new(config).run(&data).unwrap();
        assert_eq!(report.trials.len(), 60);
        assert!(report.scored_trials() > 0);
        assert!(report.scored_trials() < report.trials.len());
        assert!(report
            .trials
            .iter()
            .any(|trial| trial.test_size == 0 && !trial.is_scored()));
        for trial in report.trials.iter().filter(|trial| !trial.is_scored()) {
            assert!(trial.learn_size == 0 || trial.test_size == 0);
            assert_eq!(trial.accuracy(), None);
        }

        let sum: f64 = report.trials.iter().filter_map(TrialResult::accuracy).sum();
        assert_relative_eq!(report.mean_accuracy, sum / report.scored_trials() as f64);
    }

    #[test]
    fn test_keep_predictions() {
        let mut config = config(Algorithm::Cart, 2);
        config.set_keep_predictions(KeepPredictions::EveryTrial);
        let report = Evaluation::new(config).run(&movies(2)).unwrap();
        for trial in &report.trials {
            let predictions = trial.predictions.as_ref().unwrap();
            assert_eq!(predictions.test.len(), trial.test_size);
            assert_eq!(predictions.predicted.len(), trial.test_size);
        }
    }

    #[test]
    fn test_keep_last_trial_predictions_only() {
        let mut config = config(Algorithm::Id3, 4);
        config.set_keep_predictions(KeepPredictions::LastTrial);
        let report = Evaluation::new(config).run(&movies(2)).unwrap();

        let kept = report
            .trials
            .iter()
            .filter(|trial| trial.predictions.is_some())
            .map(|trial| trial.trial)
            .collect::<Vec<_>>();
        assert_eq!(kept, vec![3]);
    }

    #[test]
    fn test_empty_dataset() {
        let data = movies(1).with_rows(Vec::new());
        assert!(matches!(
            Evaluation::default().run(&data),
            Err(TreeError::EmptyDataset)
        ));
    }
}
