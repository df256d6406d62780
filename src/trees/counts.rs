use crate::data::dataset::Example;
use std::fmt;

/// Gains closer together than this are equal; gains at or below it are no gain.
///
/// Entropy and Gini sum over classes in encounter order, so equal distributions
/// seen in different orders can differ in the last bits.
pub const MIN_GAIN: f64 = 1e-12;

/// Class frequencies of a set of rows, kept in first-encounter order.
///
/// Encounter order is what makes [`ClassCounts::majority`] deterministic:
/// ties go to the class that was seen first. That is an arbitrary policy
/// kept for reproducibility, not a statistically preferable one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    counts: Vec<(String, usize)>,
}

impl ClassCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies the value at `target` over `rows`.
    pub fn from_rows<'a, I>(rows: I, target: usize) -> Self
    where
        I: IntoIterator<Item = &'a Example>,
    {
        let mut counts = Self::new();
        for row in rows {
            counts.add(row.value(target));
        }
        counts
    }

    pub fn add(&mut self, class: &str) {
        match self.counts.iter_mut().find(|(seen, _)| seen == class) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((class.to_string(), 1)),
        }
    }

    pub fn get(&self, class: &str) -> usize {
        self.counts
            .iter()
            .find(|(seen, _)| seen == class)
            .map_or(0, |&(_, count)| count)
    }

    /// Number of distinct classes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|&(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(class, count)| (class.as_str(), *count))
    }

    /// `true` when at most one class is present.
    pub fn is_pure(&self) -> bool {
        self.counts.len() <= 1
    }

    /// The most frequent class; the first one encountered wins a tie.
    pub fn majority(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (class, count) in self.iter() {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((class, count));
            }
        }
        best.map(|(class, _)| class)
    }

    fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(move |&(_, count)| count as f64 / total)
    }

    /// Shannon entropy in bits, `-Σ p·log2(p)`. Zero for an empty tally.
    pub fn entropy(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.probabilities().map(|p| -p * p.log2()).sum()
    }

    /// Gini impurity, `1 - Σ p²`. Zero for an empty tally.
    pub fn gini(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        1.0 - self.probabilities().map(|p| p * p).sum::<f64>()
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (class, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", class, count)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counts(classes: &[&str]) -> ClassCounts {
        let mut counts = ClassCounts::new();
        for class in classes {
            counts.add(class);
        }
        counts
    }

    #[test]
    fn test_counts_keep_encounter_order() {
        let counts = counts(&["b", "a", "b", "c"]);
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![("b", 2), ("a", 1), ("c", 1)]
        );
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get("a"), 1);
        assert_eq!(counts.get("z"), 0);
    }

    #[test]
    fn test_majority_first_maximum() {
        assert_eq!(counts(&["0", "1", "1", "0"]).majority(), Some("0"));
        assert_eq!(counts(&["1", "0", "0"]).majority(), Some("0"));
        assert_eq!(ClassCounts::new().majority(), None);
    }

    #[test]
    fn test_entropy_pure_is_zero() {
        assert_relative_eq!(counts(&["2", "2", "2"]).entropy(), 0.0);
        assert_relative_eq!(ClassCounts::new().entropy(), 0.0);
    }

    #[test]
    fn test_entropy_values() {
        assert_relative_eq!(counts(&["0", "1"]).entropy(), 1.0);
        assert_relative_eq!(counts(&["a", "b", "c", "d"]).entropy(), 2.0);
        assert_relative_eq!(
            counts(&["1", "1", "0"]).entropy(),
            0.9182958340544896,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_entropy_bounded_by_log_of_classes() {
        for classes in [
            vec!["a", "a", "b"],
            vec!["a", "b", "c", "c", "c"],
            vec!["x", "y", "y", "z", "z", "z", "w"],
        ] {
            let counts = counts(&classes);
            assert!(counts.entropy() > 0.0);
            assert!(counts.entropy() <= (counts.len() as f64).log2() + 1e-12);
        }
    }

    #[test]
    fn test_gini_values() {
        assert_relative_eq!(counts(&["1", "1"]).gini(), 0.0);
        assert_relative_eq!(counts(&["0", "1"]).gini(), 0.5);
        assert_relative_eq!(counts(&["a", "b", "c"]).gini(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gini_in_unit_interval() {
        for classes in [vec!["a", "b"], vec!["a", "b", "c", "d", "e", "f"], vec!["a"]] {
            let gini = counts(&classes).gini();
            assert!((0.0..1.0).contains(&gini));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(counts(&["1", "0", "1"]).to_string(), "{1: 2, 0: 1}");
    }
}
