//! Dense feed-forward classifier
//!
//! Architecture: Input(11) → 128 → 64 → 32 → 64 → 32 → 1
//!
//! Every hidden layer is Linear → ReLU → Dropout, the output layer is
//! Linear → Sigmoid.

use std::path::PathBuf;

use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::FeatureSchema;
use crate::{HeartError, Result};

/// Configuration for the classifier
#[derive(Debug, Clone)]
pub struct HeartNetConfig {
    /// Input dimension (schema features)
    pub input_dim: usize,
    /// Hidden layer widths, in order
    pub hidden_dims: Vec<usize>,
    /// Dropout rate after every hidden layer
    pub dropout: f64,
}

impl Default for HeartNetConfig {
    fn default() -> Self {
        HeartNetConfig {
            input_dim: FeatureSchema::DIM,
            hidden_dims: vec![128, 64, 32, 64, 32],
            dropout: 0.2,
        }
    }
}

impl HeartNetConfig {
    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }
}

/// A single hidden layer block: Linear → ReLU → Dropout
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize, dropout: f64) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear.forward(x);
        let x = relu(x);
        self.dropout.forward(x)
    }
}

/// Binary heart disease classifier
///
/// Dropout is only active on autodiff backends; call `.valid()` on a
/// trained model to get the inference variant.
#[derive(Module, Debug)]
pub struct HeartNet<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    output: Linear<B>,
}

impl<B: Backend> HeartNet<B> {
    /// Create a new, randomly initialized network
    pub fn new(device: &B::Device, config: &HeartNetConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = config.input_dim;

        for &out_dim in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, out_dim, config.dropout));
            in_dim = out_dim;
        }

        HeartNet {
            hidden,
            output: LinearConfig::new(in_dim, 1).init(device),
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `features` - Encoded features [batch, input_dim]
    ///
    /// # Returns
    /// Probability of heart disease [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(features, |x, block| block.forward(x));

        sigmoid(self.output.forward(x))
    }

    /// Per-input importance: sum of absolute first-layer weights, normalized to sum to 1
    pub fn feature_importance(&self) -> Result<Vec<f32>> {
        let first = match self.hidden.first() {
            Some(block) => &block.linear,
            None => &self.output,
        };

        // Linear weights are stored as [d_input, d_output]
        let sums = first.weight.val().abs().sum_dim(1);
        let sums: Vec<f32> = sums
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| HeartError::Tensor(format!("{:?}", e)))?;

        let total: f32 = sums.iter().sum();
        if total <= 0.0 {
            return Ok(vec![1.0 / sums.len() as f32; sums.len()]);
        }

        Ok(sums.iter().map(|s| s / total).collect())
    }

    /// Save weights to `<path>.mpk`
    pub fn save(&self, path: &str) -> Result<()> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), PathBuf::from(path))
            .map_err(|e| HeartError::Record(e.to_string()))
    }

    /// Load weights from `<path>.mpk` into a network built from `config`
    pub fn load(device: &B::Device, path: &str, config: &HeartNetConfig) -> Result<Self> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(PathBuf::from(path), device)
            .map_err(|e| HeartError::Record(e.to_string()))?;

        let model = Self::new(device, config);
        Ok(model.load_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_forward_shape_and_range() {
        let device = Default::default();
        let model = HeartNet::<TestBackend>::new(&device, &HeartNetConfig::default());
        assert_eq!(model.hidden.len(), 5);

        let x = Tensor::random(
            [4, FeatureSchema::DIM],
            Distribution::Normal(0.0, 50.0),
            &device,
        );
        let probs = model.forward(x);
        assert_eq!(probs.dims(), [4, 1]);

        for p in probs.into_data().to_vec::<f32>().unwrap() {
            assert!((0.0..=1.0).contains(&p), "probability out of range: {}", p);
        }
    }

    #[test]
    fn test_feature_importance_sums_to_one() {
        let device = Default::default();
        let model = HeartNet::<TestBackend>::new(&device, &HeartNetConfig::default());

        let importance = model.feature_importance().unwrap();
        assert_eq!(importance.len(), FeatureSchema::DIM);
        assert!(importance.iter().all(|&v| v >= 0.0));

        let total: f32 = importance.iter().sum();
        assert!((total - 1.0).abs() < 1e-5, "importance sums to {}", total);
    }

    #[test]
    fn test_save_and_load_preserve_outputs() {
        let device = Default::default();
        let config = HeartNetConfig::default();
        let model = HeartNet::<TestBackend>::new(&device, &config);

        let dir = std::env::temp_dir().join(format!("heart-net-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("model");
        let path = path.to_str().unwrap();

        model.save(path).unwrap();
        assert!(dir.join("model.mpk").exists());

        let loaded = HeartNet::<TestBackend>::load(&device, path, &config).unwrap();
        let x = Tensor::<TestBackend, 2>::ones([2, FeatureSchema::DIM], &device);
        let a = model.forward(x.clone()).into_data().to_vec::<f32>().unwrap();
        let b = loaded.forward(x).into_data().to_vec::<f32>().unwrap();
        assert_eq!(a, b);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let device = Default::default();
        let result = HeartNet::<TestBackend>::load(
            &device,
            "/nonexistent/heart_model",
            &HeartNetConfig::default(),
        );
        assert!(matches!(result, Err(HeartError::Record(_))));
    }
}
