//! Model training
//!
//! Training loop, test-set evaluation, metrics tracking and reporting.

pub mod evaluation;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod trainer;

pub use evaluation::{ClassificationMetrics, ConfusionMatrix};
pub use metrics::{Metrics, TrainingHistory};
pub use pipeline::{run_training, train_and_save, TrainingOutcome};
pub use trainer::Trainer;
