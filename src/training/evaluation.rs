//! Test-set evaluation from a thresholded confusion matrix

use std::fmt;

use serde::{Deserialize, Serialize};

/// Probability above which a prediction counts as positive
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Counts of a binary classifier's outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Tally predicted probabilities against 0/1 targets
    pub fn from_predictions(probs: &[f32], targets: &[f32]) -> Self {
        let mut cm = ConfusionMatrix::default();

        for (&p, &t) in probs.iter().zip(targets.iter()) {
            match (p > DECISION_THRESHOLD, t >= 0.5) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (true, false) => cm.fp += 1,
                (false, true) => cm.fn_ += 1,
            }
        }

        cm
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn metrics(&self) -> ClassificationMetrics {
        ClassificationMetrics {
            precision: ratio(self.tp, self.tp + self.fp),
            npv: ratio(self.tn, self.tn + self.fn_),
            sensitivity: ratio(self.tp, self.tp + self.fn_),
            specificity: ratio(self.tn, self.tn + self.fp),
            accuracy: ratio(self.tp + self.tn, self.total()),
            confusion: *self,
        }
    }
}

/// `num / den`, or 0 when the denominator is 0
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Metrics derived from a confusion matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    /// Positive predictive value: tp / (tp + fp)
    pub precision: f64,
    /// Negative predictive value: tn / (tn + fn)
    pub npv: f64,
    /// Recall: tp / (tp + fn)
    pub sensitivity: f64,
    /// tn / (tn + fp)
    pub specificity: f64,
    /// (tp + tn) / total
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    pub fn from_predictions(probs: &[f32], targets: &[f32]) -> Self {
        ConfusionMatrix::from_predictions(probs, targets).metrics()
    }
}

impl fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Precision: {:.2}", self.precision)?;
        writeln!(f, "Negative Predictive Value (NPV): {:.2}", self.npv)?;
        writeln!(f, "Sensitivity (Recall): {:.2}", self.sensitivity)?;
        writeln!(f, "Specificity: {:.2}", self.specificity)?;
        write!(f, "Accuracy: {:.2}", self.accuracy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_counts() {
        let probs = [0.9, 0.8, 0.2, 0.6, 0.1, 0.5];
        let targets = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let cm = ConfusionMatrix::from_predictions(&probs, &targets);

        assert_eq!(
            cm,
            ConfusionMatrix {
                tp: 2,
                tn: 2,
                fp: 1,
                fn_: 1
            }
        );
        assert_eq!(cm.total(), 6);
    }

    #[test]
    fn test_metric_values() {
        let cm = ConfusionMatrix {
            tp: 40,
            tn: 30,
            fp: 10,
            fn_: 20,
        };
        let m = cm.metrics();

        assert!((m.precision - 0.8).abs() < 1e-12);
        assert!((m.npv - 0.6).abs() < 1e-12);
        assert!((m.sensitivity - 40.0 / 60.0).abs() < 1e-12);
        assert!((m.specificity - 0.75).abs() < 1e-12);
        assert_eq!(m.accuracy, 70.0 / 100.0);
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        // Every prediction negative, every target negative
        let m = ClassificationMetrics::from_predictions(&[0.1, 0.2], &[0.0, 0.0]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.sensitivity, 0.0);
        assert_eq!(m.specificity, 1.0);
        assert_eq!(m.npv, 1.0);
        assert_eq!(m.accuracy, 1.0);

        let empty = ConfusionMatrix::default().metrics();
        assert_eq!(empty.accuracy, 0.0);
    }

    #[test]
    fn test_metrics_are_bounded() {
        let probs: Vec<f32> = (0..50).map(|i| (i as f32 * 0.37) % 1.0).collect();
        let targets: Vec<f32> = (0..50).map(|i| (i % 3 == 0) as u8 as f32).collect();
        let m = ClassificationMetrics::from_predictions(&probs, &targets);

        for v in [m.precision, m.npv, m.sensitivity, m.specificity, m.accuracy] {
            assert!((0.0..=1.0).contains(&v));
        }
        let cm = m.confusion;
        assert_eq!(m.accuracy, (cm.tp + cm.tn) as f64 / cm.total() as f64);
    }

    #[test]
    fn test_display() {
        let text = ConfusionMatrix {
            tp: 1,
            tn: 1,
            fp: 0,
            fn_: 0,
        }
        .metrics()
        .to_string();
        assert!(text.contains("Precision: 1.00"));
        assert!(text.ends_with("Accuracy: 1.00"));
    }
}
