//! Common interface of the tree classifiers
use crate::data::dataset::{Dataset, Example};
use crate::error::TreeError;
use crate::trees::cart::CartClassifier;
use crate::trees::id3::Id3Classifier;
use crate::trees::params::Id3Params;
use std::fmt;
use std::str::FromStr;

pub trait Classifier {
    /// Induces a fresh tree from the learn set, discarding any previous one.
    fn fit(&mut self, learn: &Dataset) -> Result<(), TreeError>;

    /// Predicted class of one row, or `None` if the model has no answer for it.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] if called before [`Classifier::fit`].
    fn predict_one(&self, example: &Example) -> Result<Option<String>, TreeError>;

    /// Predicted classes of every row, in row order.
    fn predict(&self, dataset: &Dataset) -> Result<Vec<Option<String>>, TreeError> {
        dataset
            .rows()
            .iter()
            .map(|example| self.predict_one(example))
            .collect()
    }

    /// Text rendering of the induced tree, if there is one.
    fn describe(&self) -> Option<String>;
}

/// Tree induction algorithm used by an evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Multiway splits chosen by information gain; prediction by rule matching.
    #[default]
    Id3,
    /// Binary equality splits chosen by Gini impurity reduction.
    Cart,
}

impl Algorithm {
    /// A fresh, unfitted classifier for this algorithm.
    pub fn classifier(&self, id3_params: &Id3Params) -> Box<dyn Classifier + Send> {
        match self {
            Algorithm::Id3 => Box::new(Id3Classifier::with_params(id3_params.clone())),
            Algorithm::Cart => Box::new(CartClassifier::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Id3 => write!(f, "ID3"),
            Algorithm::Cart => write!(f, "CART"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id3" => Ok(Algorithm::Id3),
            "cart" => Ok(Algorithm::Cart),
            other => Err(format!("unknown algorithm '{other}', expected 'id3' or 'cart'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("id3".parse::<Algorithm>(), Ok(Algorithm::Id3));
        assert_eq!("CART".parse::<Algorithm>(), Ok(Algorithm::Cart));
        assert!("c4.5".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_unfitted_classifiers() {
        let example = Example::new(vec!["Action".into(), "1".into()]);
        for algorithm in [Algorithm::Id3, Algorithm::Cart] {
            let classifier = algorithm.classifier(&Id3Params::new());
            assert!(matches!(
                classifier.predict_one(&example),
                Err(TreeError::NotFitted)
            ));
            assert!(classifier.describe().is_none());
        }
    }
}
