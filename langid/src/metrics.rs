//! Evaluation metrics for multi-class identification.

use std::fmt;

use crate::errors::{LangidError, Result};

/// Precision, recall, F1 score and support of one class, or their macro average.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Counts of (expected, predicted) class pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfusionMatrix {
    n_classes: usize,
    counts: Vec<usize>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Builds a matrix from parallel slices of expected and predicted classes.
    ///
    /// # Errors
    ///
    /// [`LangidError::DimensionMismatch`] is returned if the slices differ in length or a class is
    /// out of range.
    pub fn from_predictions(
        expected: &[usize],
        predicted: &[usize],
        n_classes: usize,
    ) -> Result<Self> {
        if expected.len() != predicted.len() {
            return Err(LangidError::dimension_mismatch(format!(
                "{} expected classes but {} predictions",
                expected.len(),
                predicted.len()
            )));
        }
        let mut matrix = Self::new(n_classes);
        for (&e, &p) in expected.iter().zip(predicted) {
            matrix.add(e, p)?;
        }
        Ok(matrix)
    }

    /// Records one outcome.
    ///
    /// # Errors
    ///
    /// [`LangidError::DimensionMismatch`] is returned if a class is out of range.
    pub fn add(&mut self, expected: usize, predicted: usize) -> Result<()> {
        if expected >= self.n_classes || predicted >= self.n_classes {
            return Err(LangidError::dimension_mismatch(format!(
                "class pair ({expected}, {predicted}) is out of range for {} classes",
                self.n_classes
            )));
        }
        self.counts[expected * self.n_classes + predicted] += 1;
        Ok(())
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of samples of class `expected` predicted as `predicted`.
    pub fn get(&self, expected: usize, predicted: usize) -> usize {
        self.counts[expected * self.n_classes + predicted]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.n_classes).map(|c| self.get(c, c)).sum()
    }

    /// Ratio of correct predictions, 0 for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Number of samples whose expected class is `class`.
    pub fn support(&self, class: usize) -> usize {
        (0..self.n_classes).map(|p| self.get(class, p)).sum()
    }

    /// Number of samples of `class` predicted as another class.
    pub fn errors(&self, class: usize) -> usize {
        self.support(class) - self.get(class, class)
    }

    fn n_predicted(&self, class: usize) -> usize {
        (0..self.n_classes).map(|e| self.get(e, class)).sum()
    }

    /// Scores of a single class. Undefined ratios are reported as 0.
    pub fn report(&self, class: usize) -> ClassReport {
        let tp = self.get(class, class);
        let precision = ratio(tp, self.n_predicted(class));
        let recall = ratio(tp, self.support(class));
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassReport {
            precision,
            recall,
            f1,
            support: self.support(class),
        }
    }

    /// Unweighted mean of the per-class scores. The support is the total.
    pub fn macro_average(&self) -> ClassReport {
        let mut avg = ClassReport {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
            support: self.total(),
        };
        if self.n_classes == 0 {
            return avg;
        }
        for c in 0..self.n_classes {
            let r = self.report(c);
            avg.precision += r.precision;
            avg.recall += r.recall;
            avg.f1 += r.f1;
        }
        let n = self.n_classes as f64;
        avg.precision /= n;
        avg.recall /= n;
        avg.f1 /= n;
        avg
    }
}

impl fmt::Display for ConfusionMatrix {
    /// Rows are expected classes, columns are predicted classes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in 0..self.n_classes {
            let row: Vec<String> = (0..self.n_classes)
                .map(|p| self.get(e, p).to_string())
                .collect();
            writeln!(f, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    // expected \ predicted
    //      0  1  2
    // 0 [  3  1  0 ]
    // 1 [  0  2  2 ]
    // 2 [  1  0  1 ]
    fn sample_matrix() -> ConfusionMatrix {
        let expected = [0, 0, 0, 0, 1, 1, 1, 1, 2, 2];
        let predicted = [0, 0, 0, 1, 1, 1, 2, 2, 0, 2];
        ConfusionMatrix::from_predictions(&expected, &predicted, 3).unwrap()
    }

    #[test]
    fn test_counts() {
        let m = sample_matrix();
        assert_eq!(10, m.total());
        assert_eq!(6, m.correct());
        assert_eq!(1, m.get(0, 1));
        assert_eq!(2, m.get(1, 2));
        assert_eq!(vec![4, 4, 2], (0..3).map(|c| m.support(c)).collect::<Vec<_>>());
        assert_eq!(vec![1, 2, 1], (0..3).map(|c| m.errors(c)).collect::<Vec<_>>());
        assert_close(0.6, m.accuracy());
    }

    #[test]
    fn test_report() {
        let m = sample_matrix();

        let r = m.report(0);
        assert_close(0.75, r.precision);
        assert_close(0.75, r.recall);
        assert_close(0.75, r.f1);
        assert_eq!(4, r.support);

        let r = m.report(1);
        assert_close(2.0 / 3.0, r.precision);
        assert_close(0.5, r.recall);
        assert_close(4.0 / 7.0, r.f1);

        let r = m.report(2);
        assert_close(1.0 / 3.0, r.precision);
        assert_close(0.5, r.recall);
        assert_close(0.4, r.f1);
    }

    #[test]
    fn test_macro_average() {
        let avg = sample_matrix().macro_average();
        assert_close((0.75 + 2.0 / 3.0 + 1.0 / 3.0) / 3.0, avg.precision);
        assert_close((0.75 + 0.5 + 0.5) / 3.0, avg.recall);
        assert_close((0.75 + 4.0 / 7.0 + 0.4) / 3.0, avg.f1);
        assert_eq!(10, avg.support);
    }

    #[test]
    fn test_never_predicted_class() {
        let m = ConfusionMatrix::from_predictions(&[0, 1], &[0, 0], 2).unwrap();
        let r = m.report(1);
        assert_eq!(0.0, r.precision);
        assert_eq!(0.0, r.recall);
        assert_eq!(0.0, r.f1);
        assert_eq!(0.0, ConfusionMatrix::new(2).accuracy());
    }

    #[test]
    fn test_out_of_range() {
        let mut m = ConfusionMatrix::new(2);
        assert!(matches!(m.add(0, 2), Err(LangidError::DimensionMismatch(_))));
        assert!(ConfusionMatrix::from_predictions(&[0], &[0, 1], 2).is_err());
    }

    #[test]
    fn test_display() {
        let m = ConfusionMatrix::from_predictions(&[0, 0, 1], &[0, 1, 1], 2).unwrap();
        assert_eq!("1\t1\n0\t1\n", m.to_string());
    }
}
