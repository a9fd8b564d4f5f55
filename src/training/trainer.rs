//! Training loop and loss computation

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataloader::DataLoaderBuilder;
use burn::module::AutodiffModule;
use burn::optim::adaptor::OptimizerAdaptor;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Tensor};

use crate::data::{HeartBatch, HeartBatcher, HeartDataset};
use crate::model::{HeartNet, HeartNetConfig};
use crate::training::metrics::{count_correct, Metrics, TrainingHistory};
use crate::{HeartError, Result, TrainingConfig};

/// Epochs between info-level progress lines
const LOG_EVERY: usize = 100;

/// Binary cross-entropy on probabilities, clamped away from 0 and 1
pub fn binary_cross_entropy<B: Backend>(probs: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let eps = 1e-7;
    let probs_clamped = probs.clamp(eps, 1.0 - eps);
    let loss = targets.clone().neg() * probs_clamped.clone().log()
        - (targets.neg() + 1.0) * (probs_clamped.neg() + 1.0).log();
    loss.mean()
}

fn tensor_to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec()
        .map_err(|e| HeartError::Tensor(format!("{:?}", e)))
}

/// Run the model over a whole dataset in one batch.
///
/// Returns (probabilities, targets) in dataset order.
pub fn predict_dataset<B: Backend>(
    model: &HeartNet<B>,
    dataset: &HeartDataset,
    device: &B::Device,
) -> Result<(Vec<f32>, Vec<f32>)> {
    if dataset.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let batcher = HeartBatcher::<B>::new(device.clone());
    let batch = batcher.batch(dataset.samples().to_vec(), device);

    let probs = tensor_to_vec(model.forward(batch.features))?;
    let targets = tensor_to_vec(batch.labels)?;
    Ok((probs, targets))
}

/// Trainer for the heart disease classifier
pub struct Trainer<B: AutodiffBackend> {
    model: HeartNet<B>,
    optimizer: OptimizerAdaptor<Adam, HeartNet<B>, B>,
    config: TrainingConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> Trainer<B> {
    /// Create a trainer with a freshly initialized network.
    ///
    /// Seeds the backend RNG first so weight init and dropout masks repeat.
    pub fn new(device: B::Device, config: TrainingConfig) -> Self {
        B::seed(config.seed);

        let net_config = HeartNetConfig::default().with_dropout(config.dropout);
        let model = HeartNet::new(&device, &net_config);
        let optimizer = AdamConfig::new().init();

        Trainer {
            model,
            optimizer,
            config,
            device,
        }
    }

    /// Train for the configured number of epochs, no early stopping
    pub fn train(
        mut self,
        train_dataset: HeartDataset,
        val_dataset: HeartDataset,
    ) -> Result<(HeartNet<B>, TrainingHistory)> {
        if train_dataset.is_empty() {
            return Err(HeartError::EmptyDataset("training set is empty".to_string()));
        }

        let batch_size = self.config.batch_size.max(1);

        let train_loader = DataLoaderBuilder::new(HeartBatcher::<B>::new(self.device.clone()))
            .batch_size(batch_size)
            .shuffle(self.config.seed)
            .build(train_dataset);

        let val_loader =
            DataLoaderBuilder::new(HeartBatcher::<B::InnerBackend>::new(self.device.clone()))
                .batch_size(batch_size)
                .build(val_dataset);

        let mut history = TrainingHistory::new();
        let epochs = self.config.epochs;

        log::info!(
            "Starting training for {} epochs (batch size {}, lr {})",
            epochs,
            batch_size,
            self.config.learning_rate
        );

        for epoch in 0..epochs {
            let train_metrics = self.train_epoch(train_loader.iter())?;
            let val_metrics = self.validate_epoch(val_loader.iter())?;

            history.record_epoch(&train_metrics, &val_metrics);

            if (epoch + 1) % LOG_EVERY == 0 || epoch == 0 || epoch + 1 == epochs {
                log::info!(
                    "Epoch {}/{}: Train: {} | Val: {}",
                    epoch + 1,
                    epochs,
                    train_metrics,
                    val_metrics
                );
            } else {
                log::debug!(
                    "Epoch {}/{}: Train: {} | Val: {}",
                    epoch + 1,
                    epochs,
                    train_metrics,
                    val_metrics
                );
            }
        }

        Ok((self.model, history))
    }

    /// Train one epoch
    fn train_epoch(&mut self, loader: impl Iterator<Item = HeartBatch<B>>) -> Result<Metrics> {
        let mut metrics = Metrics::new();

        for batch in loader {
            let batch_size = batch.features.dims()[0];
            let targets = batch.labels.unsqueeze_dim::<2>(1);

            // Forward pass
            let probs = self.model.forward(batch.features);
            let loss = binary_cross_entropy(probs.clone(), targets.clone());
            let loss_val: f32 = loss.clone().into_scalar().elem();

            // Accuracy before the update, as the loss was
            let correct = count_correct(&tensor_to_vec(probs)?, &tensor_to_vec(targets)?);

            // Backward pass
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &self.model);

            // Update weights
            self.model = self
                .optimizer
                .step(self.config.learning_rate, self.model.clone(), grads);

            metrics.update(loss_val, correct, batch_size);
        }

        Ok(metrics)
    }

    /// Validate one epoch with dropout disabled
    fn validate_epoch(
        &self,
        loader: impl Iterator<Item = HeartBatch<B::InnerBackend>>,
    ) -> Result<Metrics> {
        let model = self.model.valid();
        let mut metrics = Metrics::new();

        for batch in loader {
            let batch_size = batch.features.dims()[0];
            let targets = batch.labels.unsqueeze_dim::<2>(1);

            let probs = model.forward(batch.features);
            let loss = binary_cross_entropy(probs.clone(), targets.clone());
            let loss_val: f32 = loss.into_scalar().elem();

            let correct = count_correct(&tensor_to_vec(probs)?, &tensor_to_vec(targets)?);
            metrics.update(loss_val, correct, batch_size);
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HeartSample;
    use crate::features::FeatureSchema;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<TestBackend>;

    /// Linearly separable toy data: label is 1 when the first feature is large
    fn toy_dataset(n: usize) -> HeartDataset {
        HeartDataset::new(
            (0..n)
                .map(|i| {
                    let x = i as f32 / n as f32;
                    let mut features = [0.1f32; FeatureSchema::DIM];
                    features[0] = x;
                    HeartSample {
                        features,
                        label: if x > 0.5 { 1.0 } else { 0.0 },
                    }
                })
                .collect(),
        )
    }

    fn small_config(epochs: usize) -> TrainingConfig {
        TrainingConfig {
            epochs,
            batch_size: 8,
            learning_rate: 1e-2,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_bce_matches_closed_form() {
        let device = Default::default();
        let probs = Tensor::<TestBackend, 2>::from_floats([[0.8], [0.3]], &device);
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0], [0.0]], &device);

        let loss: f32 = binary_cross_entropy(probs, targets).into_scalar().elem();
        let expected = -((0.8f32).ln() + (0.7f32).ln()) / 2.0;
        assert!((loss - expected).abs() < 1e-5, "{} vs {}", loss, expected);
    }

    #[test]
    fn test_bce_is_finite_at_extremes() {
        let device = Default::default();
        let probs = Tensor::<TestBackend, 2>::from_floats([[0.0], [1.0]], &device);
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0], [0.0]], &device);

        let loss: f32 = binary_cross_entropy(probs, targets).into_scalar().elem();
        assert!(loss.is_finite());
    }

    #[test]
    fn test_training_records_every_epoch() {
        let device = Default::default();
        let trainer = Trainer::<TestAutodiffBackend>::new(device, small_config(3));

        let (model, history) = trainer
            .train(toy_dataset(32), toy_dataset(8))
            .unwrap();

        assert_eq!(history.epochs(), 3);
        assert_eq!(history.val_accuracies.len(), 3);
        assert!(history.train_losses.iter().all(|l| l.is_finite()));

        let (probs, targets) =
            predict_dataset(&model.valid(), &toy_dataset(8), &Default::default()).unwrap();
        assert_eq!(probs.len(), 8);
        assert_eq!(targets.len(), 8);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_training_reduces_loss() {
        let device = Default::default();
        let trainer = Trainer::<TestAutodiffBackend>::new(device, small_config(30));

        let (_, history) = trainer
            .train(toy_dataset(64), toy_dataset(16))
            .unwrap();

        let first = history.train_losses[0];
        let last = *history.train_losses.last().unwrap();
        assert!(last < first, "loss went from {} to {}", first, last);
    }

    #[test]
    fn test_empty_training_set_fails() {
        let device = Default::default();
        let trainer = Trainer::<TestAutodiffBackend>::new(device, small_config(1));
        let result = trainer.train(HeartDataset::default(), toy_dataset(4));
        assert!(matches!(result, Err(HeartError::EmptyDataset(_))));
    }
}
