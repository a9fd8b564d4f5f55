//! Heart disease prediction using a dense neural network
//!
//! Trains a binary classifier on tabular patient records and serves
//! predictions from the saved model over HTTP.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod server;
pub mod training;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HeartError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model record error: {0}")]
    Record(String),

    #[error("Model not trained - run `heart train` first (looked for {0})")]
    NoModel(String),

    #[error("Feature schema mismatch: model was trained with {found}, binary expects {expected}")]
    SchemaMismatch { expected: String, found: String },

    #[error("Dataset is empty or too small: {0}")]
    EmptyDataset(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tensor data error: {0}")]
    Tensor(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

pub type Result<T> = std::result::Result<T, HeartError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub dropout: f64,
    /// Fraction of all rows held out as the test set
    pub test_ratio: f64,
    /// Fraction of the training rows held out for per-epoch validation
    pub validation_ratio: f64,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            epochs: 2000,
            batch_size: 64,
            learning_rate: 1e-3,
            dropout: 0.2,
            test_ratio: 0.2,
            validation_ratio: 0.1,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Reject values burn would panic on or that leave a split empty
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.dropout) {
            return Err(HeartError::Config(format!(
                "training.dropout must be within [0, 1], got {}",
                self.dropout
            )));
        }
        for (name, ratio) in [
            ("test_ratio", self.test_ratio),
            ("validation_ratio", self.validation_ratio),
        ] {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(HeartError::Config(format!(
                    "training.{} must be within (0, 1), got {}",
                    name, ratio
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(HeartError::Config(
                "training.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dataset_path: String,
    /// Model path without extension; weights go to `.mpk`, metadata to `.json`
    pub model_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            dataset_path: "data.csv".to_string(),
            model_path: "model/heart_model".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeartError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| HeartError::Config(format!("Failed to parse config: {}", e)))?;
        config.training.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path);
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HeartError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
