//! Model inference for predictions

use std::path::Path;
use std::sync::Mutex;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::FeatureSchema;
use crate::model::{HeartNet, HeartNetConfig, ModelMetadata, ModelPaths};
use crate::{HeartError, Result};

/// Predictor wrapping a trained network and its metadata.
///
/// The network is built on a plain (non-autodiff) backend, so dropout is
/// inactive. It sits behind a mutex because burn parameters are lazily
/// initialized and not `Sync`.
pub struct Predictor<B: Backend> {
    model: Mutex<HeartNet<B>>,
    metadata: ModelMetadata,
    device: B::Device,
}

impl<B: Backend> Predictor<B> {
    /// Create a new predictor
    pub fn new(model: HeartNet<B>, metadata: ModelMetadata, device: B::Device) -> Self {
        Predictor {
            model: Mutex::new(model),
            metadata,
            device,
        }
    }

    /// Load weights and metadata saved under `paths`.
    ///
    /// Fails when either file is missing or the model was trained with a
    /// different feature schema.
    pub fn load(paths: &ModelPaths, device: B::Device) -> Result<Self> {
        let metadata = ModelMetadata::load(&paths.metadata_file())?;
        metadata.check_schema()?;

        if !Path::new(&paths.weights_file()).exists() {
            return Err(HeartError::NoModel(paths.weights_file()));
        }

        let config = HeartNetConfig::default().with_dropout(metadata.dropout);
        let model = HeartNet::load(&device, paths.base(), &config)?;
        log::info!(
            "Loaded model from {} (trained {}, test accuracy {:.2}%)",
            paths.weights_file(),
            metadata.trained_at.format("%Y-%m-%d %H:%M UTC"),
            metadata.test_metrics.accuracy * 100.0
        );

        Ok(Self::new(model, metadata, device))
    }

    /// Probability of heart disease for one encoded input vector
    pub fn predict(&self, features: &[f32; FeatureSchema::DIM]) -> Result<f32> {
        let input = Tensor::<B, 1>::from_floats(features.as_slice(), &self.device)
            .reshape([1, FeatureSchema::DIM]);

        let output = {
            let model = self
                .model
                .lock()
                .map_err(|_| HeartError::Inference("model lock poisoned".to_string()))?;
            model.forward(input)
        };

        let probs: Vec<f32> = output
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| HeartError::Tensor(format!("{:?}", e)))?;

        probs
            .first()
            .copied()
            .ok_or_else(|| HeartError::Inference("model returned no output".to_string()))
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// Format a prediction for display
pub fn format_prediction(probability: f32) -> String {
    let verdict = if probability > 0.5 {
        "heart disease likely"
    } else {
        "heart disease unlikely"
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Heart disease probability: {:.1}%
│  Assessment:                {}
└─────────────────────────────────────────────────┘
"#,
        probability * 100.0,
        verdict
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::training::ClassificationMetrics;
    use crate::TrainingConfig;
    use std::collections::BTreeMap;

    /// Predictor around an untrained network
    pub fn untrained_predictor<B: Backend>(device: B::Device) -> Predictor<B> {
        B::seed(7);
        let model = HeartNet::new(&device, &HeartNetConfig::default());
        let metadata = ModelMetadata::new(
            &TrainingConfig::default(),
            BTreeMap::new(),
            &[1.0 / FeatureSchema::DIM as f32; FeatureSchema::DIM],
            ClassificationMetrics::default(),
        );
        Predictor::new(model, metadata, device)
    }
}
