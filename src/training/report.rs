//! Text rendering of training results for the terminal

use super::evaluation::ConfusionMatrix;
use super::metrics::TrainingHistory;

/// Width of the accuracy axis in characters
const CHART_WIDTH: usize = 50;

/// Maximum number of epochs shown in the accuracy chart
const CHART_ROWS: usize = 20;

/// Epoch indices spread evenly over `0..epochs`, always including the last
fn sample_epochs(epochs: usize, rows: usize) -> Vec<usize> {
    if epochs == 0 {
        return Vec::new();
    }
    if epochs <= rows {
        return (0..epochs).collect();
    }

    let mut picked: Vec<usize> = (0..rows)
        .map(|i| i * (epochs - 1) / (rows - 1))
        .collect();
    picked.dedup();
    picked
}

fn column_for(accuracy: f64) -> usize {
    let clamped = accuracy.clamp(0.0, 1.0);
    ((clamped * (CHART_WIDTH - 1) as f64).round() as usize).min(CHART_WIDTH - 1)
}

/// Train vs validation accuracy per sampled epoch.
///
/// `T` marks training accuracy, `V` validation accuracy, `*` both.
pub fn render_accuracy_curves(history: &TrainingHistory) -> String {
    let mut out = String::from("Model Accuracy (T = train, V = validation)\n");
    out.push_str(&format!(
        "Epoch    Train    Val  0%{}100%\n",
        " ".repeat(CHART_WIDTH - 6)
    ));

    for epoch in sample_epochs(history.epochs(), CHART_ROWS) {
        let train = history.train_accuracies[epoch];
        let val = history.val_accuracies[epoch];

        let mut row = vec!['·'; CHART_WIDTH];
        let (t, v) = (column_for(train), column_for(val));
        row[t] = 'T';
        row[v] = if t == v { '*' } else { 'V' };

        out.push_str(&format!(
            "{:>5} {:>7.2}% {:>6.2}% |{}|\n",
            epoch + 1,
            train * 100.0,
            val * 100.0,
            row.iter().collect::<String>()
        ));
    }

    out
}

/// Box-drawn 2x2 confusion matrix, rows actual, columns predicted
pub fn render_confusion_matrix(cm: &ConfusionMatrix) -> String {
    format!(
        r#"Confusion Matrix
           ┌─────────────┬─────────────┐
           │ Predicted 0 │ Predicted 1 │
┌──────────┼─────────────┼─────────────┤
│ Actual 0 │ {:>11} │ {:>11} │
├──────────┼─────────────┼─────────────┤
│ Actual 1 │ {:>11} │ {:>11} │
└──────────┴─────────────┴─────────────┘
"#,
        cm.tn, cm.fp, cm.fn_, cm.tp
    )
}

/// Feature importances, largest first
pub fn render_feature_importance(importance: &[(String, f32)]) -> String {
    let mut sorted: Vec<&(String, f32)> = importance.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut out = String::from("Feature Importance\n");
    for (name, value) in sorted {
        let bar = "█".repeat((value * 100.0).round() as usize);
        out.push_str(&format!("  {:<15} {:.4} {}\n", name, value, bar));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::metrics::Metrics;

    fn history(epochs: usize) -> TrainingHistory {
        let mut history = TrainingHistory::new();
        for epoch in 0..epochs {
            let mut train = Metrics::new();
            train.update(0.5, epoch.min(10), 10);
            let mut val = Metrics::new();
            val.update(0.6, 5, 10);
            history.record_epoch(&train, &val);
        }
        history
    }

    #[test]
    fn test_sample_epochs() {
        assert!(sample_epochs(0, 20).is_empty());
        assert_eq!(sample_epochs(3, 20), vec![0, 1, 2]);

        let picked = sample_epochs(2000, 20);
        assert_eq!(picked.len(), 20);
        assert_eq!(picked[0], 0);
        assert_eq!(*picked.last().unwrap(), 1999);
    }

    #[test]
    fn test_accuracy_chart_rows() {
        let text = render_accuracy_curves(&history(100));
        // Title, axis header and one line per sampled epoch
        assert_eq!(text.lines().count(), 2 + CHART_ROWS);
        assert!(text.lines().last().unwrap().starts_with("  100"));
    }

    #[test]
    fn test_accuracy_chart_overlap_marker() {
        // Epoch 6 has train and validation both at 50%
        let text = render_accuracy_curves(&history(10));
        let line = text.lines().nth(2 + 5).unwrap();
        assert!(line.contains('*'), "{}", line);
        assert!(!line.contains('T'));
    }

    #[test]
    fn test_confusion_matrix_layout() {
        let cm = ConfusionMatrix {
            tp: 90,
            tn: 70,
            fp: 12,
            fn_: 12,
        };
        let text = render_confusion_matrix(&cm);
        assert!(text.contains("│ Actual 0 │          70 │          12 │"));
        assert!(text.contains("│ Actual 1 │          12 │          90 │"));
        assert!(text.starts_with("Confusion Matrix\n"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_feature_importance_sorted() {
        let importance = vec![
            ("Age".to_string(), 0.1),
            ("ST_Slope".to_string(), 0.3),
            ("Sex".to_string(), 0.2),
        ];
        let text = render_feature_importance(&importance);
        let names: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(names, vec!["ST_Slope", "Sex", "Age"]);
    }
}
