//! Training metrics and per-epoch history

use std::fmt;

/// Metrics accumulated over one pass of a data loader
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Sum of per-batch mean losses
    pub total_loss: f64,
    /// Number of predictions on the right side of 0.5
    pub correct: usize,
    /// Total predictions
    pub total_predictions: usize,
    /// Number of batches accumulated
    pub batch_count: usize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update metrics with a batch result
    pub fn update(&mut self, loss: f32, correct: usize, batch_size: usize) {
        self.total_loss += loss as f64;
        self.correct += correct;
        self.total_predictions += batch_size;
        self.batch_count += 1;
    }

    /// Get average batch loss
    pub fn avg_loss(&self) -> f64 {
        if self.batch_count == 0 {
            0.0
        } else {
            self.total_loss / self.batch_count as f64
        }
    }

    /// Get prediction accuracy
    pub fn accuracy(&self) -> f64 {
        if self.total_predictions == 0 {
            0.0
        } else {
            self.correct as f64 / self.total_predictions as f64
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loss: {:.4} | Acc: {:.2}%",
            self.avg_loss(),
            self.accuracy() * 100.0
        )
    }
}

/// Count predictions where `prob > 0.5` agrees with `target >= 0.5`
pub fn count_correct(probs: &[f32], targets: &[f32]) -> usize {
    probs
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| (**p > 0.5) == (**t >= 0.5))
        .count()
}

/// Training history for tracking progress
#[derive(Debug, Clone)]
pub struct TrainingHistory {
    pub train_losses: Vec<f64>,
    pub val_losses: Vec<f64>,
    pub train_accuracies: Vec<f64>,
    pub val_accuracies: Vec<f64>,
}

impl Default for TrainingHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self {
            train_losses: Vec::new(),
            val_losses: Vec::new(),
            train_accuracies: Vec::new(),
            val_accuracies: Vec::new(),
        }
    }

    /// Record metrics for an epoch
    pub fn record_epoch(&mut self, train: &Metrics, val: &Metrics) {
        self.train_losses.push(train.avg_loss());
        self.val_losses.push(val.avg_loss());
        self.train_accuracies.push(train.accuracy());
        self.val_accuracies.push(val.accuracy());
    }

    pub fn epochs(&self) -> usize {
        self.train_losses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_accumulate() {
        let mut m = Metrics::new();
        m.update(0.5, 3, 4);
        m.update(0.3, 4, 4);

        assert!((m.avg_loss() - 0.4).abs() < 1e-6);
        assert!((m.accuracy() - 7.0 / 8.0).abs() < 1e-9);
        assert_eq!(format!("{}", m), "Loss: 0.4000 | Acc: 87.50%");
    }

    #[test]
    fn test_empty_metrics() {
        let m = Metrics::new();
        assert_eq!(m.avg_loss(), 0.0);
        assert_eq!(m.accuracy(), 0.0);
    }

    #[test]
    fn test_count_correct_threshold() {
        let probs = [0.9, 0.5, 0.2, 0.51];
        let targets = [1.0, 0.0, 1.0, 1.0];
        // 0.5 is not > 0.5, so it is a negative prediction
        assert_eq!(count_correct(&probs, &targets), 3);
    }

    #[test]
    fn test_history_records_each_epoch() {
        let mut history = TrainingHistory::new();
        let metrics = |loss: f32| {
            let mut m = Metrics::new();
            m.update(loss, 1, 2);
            m
        };

        history.record_epoch(&metrics(0.7), &metrics(0.6));
        history.record_epoch(&metrics(0.5), &metrics(0.4));
        history.record_epoch(&metrics(0.3), &metrics(0.45));

        assert_eq!(history.epochs(), 3);
        assert!((history.train_losses[2] - 0.3).abs() < 1e-6);
        assert!((history.val_losses[1] - 0.4).abs() < 1e-6);
        assert_eq!(history.val_accuracies, vec![0.5, 0.5, 0.5]);
    }
}
