use crate::error::TreeError;
use nalgebra::{DMatrix, DVector};

/// Confusion matrix over string class labels.
///
/// Rows are true classes, columns predicted classes, both in the order
/// the classes were first seen. Rows that received no prediction are
/// tallied per true class outside the matrix and always count as
/// misclassified.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
    classes: Vec<String>,
    matrix: DMatrix<usize>,
    unmatched: DVector<usize>,
}

impl ConfusionMatrix {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels, `None` where nothing was predicted.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTestSet`] when there are no labels.
    ///
    /// # Panics
    ///
    /// If `y_true` and `y_pred` have different lengths.
    pub fn new<S: AsRef<str>>(y_true: &[S], y_pred: &[Option<String>]) -> Result<Self, TreeError> {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "predictions and labels are of different sizes"
        );
        if y_true.is_empty() {
            return Err(TreeError::EmptyTestSet);
        }

        let mut classes: Vec<String> = Vec::new();
        let mut class_index = |class: &str| match classes.iter().position(|c| c == class) {
            Some(index) => index,
            None => {
                classes.push(class.to_string());
                classes.len() - 1
            }
        };

        let cells = y_true
            .iter()
            .zip(y_pred)
            .map(|(y_t, y_p)| {
                let row = class_index(y_t.as_ref());
                (row, y_p.as_deref().map(&mut class_index))
            })
            .collect::<Vec<_>>();

        let mut matrix = DMatrix::zeros(classes.len(), classes.len());
        let mut unmatched = DVector::zeros(classes.len());
        for (row, col) in cells {
            match col {
                Some(col) => matrix[(row, col)] += 1,
                None => unmatched[row] += 1,
            }
        }

        Ok(Self {
            classes,
            matrix,
            unmatched,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn matrix(&self) -> &DMatrix<usize> {
        &self.matrix
    }

    /// Rows for which no class was predicted.
    pub fn unmatched(&self) -> usize {
        self.unmatched.sum()
    }

    pub fn total(&self) -> usize {
        self.matrix.sum() + self.unmatched()
    }

    pub fn correct(&self) -> usize {
        self.matrix.diagonal().sum()
    }

    /// Correct predictions over all rows, unmatched rows included.
    pub fn accuracy(&self) -> f64 {
        self.correct() as f64 / self.total() as f64
    }

    /// Precision averaged over the classes that were predicted at least once.
    pub fn precision(&self) -> f64 {
        let scores = (0..self.classes.len())
            .filter_map(|class| {
                let tp = self.matrix[(class, class)];
                let predicted = self.matrix.column(class).sum();
                (predicted > 0).then(|| tp as f64 / predicted as f64)
            })
            .collect::<Vec<_>>();
        mean(&scores)
    }

    /// Recall averaged over the classes that occur among the true labels.
    ///
    /// Unmatched rows count against the recall of their true class.
    pub fn recall(&self) -> f64 {
        let scores = (0..self.classes.len())
            .filter_map(|class| {
                let tp = self.matrix[(class, class)];
                let actual = self.matrix.row(class).sum() + self.unmatched[class];
                (actual > 0).then(|| tp as f64 / actual as f64)
            })
            .collect::<Vec<_>>();
        mean(&scores)
    }
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
