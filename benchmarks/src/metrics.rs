use serde::Serialize;

/// Counts of a binary classifier's outcomes, class 1 being positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// Tally predictions against ground truth.
    ///
    /// # Panics
    ///
    /// If the two slices differ in length.
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "Arrays must have the same length"
        );

        y_true
            .iter()
            .zip(y_pred)
            .fold(Self::default(), |mut m, (&t, &p)| {
                match (t == 1, p == 1) {
                    (true, true) => m.true_positive += 1,
                    (false, true) => m.false_positive += 1,
                    (false, false) => m.true_negative += 1,
                    (true, false) => m.false_negative += 1,
                }
                m
            })
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

/// Hold-out scores of a binary classifier.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    /// Accuracy, precision, recall and F1 for class 1.
    ///
    /// A ratio whose denominator is zero is reported as 0.
    pub fn calculate(y_true: &[u8], y_pred: &[u8]) -> Self {
        let m = ConfusionMatrix::from_labels(y_true, y_pred);
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        let accuracy = ratio(m.true_positive + m.true_negative, m.total());
        let precision = ratio(m.true_positive, m.true_positive + m.false_positive);
        let recall = ratio(m.true_positive, m.true_positive + m.false_negative);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
            confusion: m,
        }
    }
}
