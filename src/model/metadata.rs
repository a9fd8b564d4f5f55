//! Model metadata sidecar
//!
//! Written next to the weights by every training run and checked by the
//! prediction service before it accepts requests.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::{FeatureSchema, SCHEMA_VERSION};
use crate::training::evaluation::ClassificationMetrics;
use crate::{HeartError, Result, TrainingConfig};

/// File locations for a model saved under a base path
#[derive(Debug, Clone)]
pub struct ModelPaths {
    base: String,
}

impl ModelPaths {
    pub fn new(base: impl Into<String>) -> Self {
        ModelPaths { base: base.into() }
    }

    /// Base path handed to the recorder, which appends `.mpk`
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn weights_file(&self) -> String {
        format!("{}.mpk", self.base)
    }

    pub fn metadata_file(&self) -> String {
        format!("{}.json", self.base)
    }

    /// Create the parent directory of the model files
    pub fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.base).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Everything known about a trained model besides its weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub schema_version: u32,
    /// CSV column names in model input order
    pub features: Vec<String>,
    /// Label encodings fitted at training time, column → (category → index)
    pub category_mappings: BTreeMap<String, BTreeMap<String, usize>>,
    pub trained_at: DateTime<Utc>,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub dropout: f64,
    pub seed: u64,
    /// Feature name → normalized first-layer importance
    pub feature_importance: Vec<(String, f32)>,
    pub test_metrics: ClassificationMetrics,
}

impl ModelMetadata {
    pub fn new(
        config: &TrainingConfig,
        category_mappings: BTreeMap<String, BTreeMap<String, usize>>,
        importance: &[f32],
        test_metrics: ClassificationMetrics,
    ) -> Self {
        let features = FeatureSchema::column_names();
        let feature_importance = features
            .iter()
            .cloned()
            .zip(importance.iter().copied())
            .collect();

        ModelMetadata {
            schema_version: SCHEMA_VERSION,
            features,
            category_mappings,
            trained_at: Utc::now(),
            epochs: config.epochs,
            batch_size: config.batch_size,
            learning_rate: config.learning_rate,
            dropout: config.dropout,
            seed: config.seed,
            feature_importance,
            test_metrics,
        }
    }

    /// Fail unless this model was trained with the compiled-in feature schema
    pub fn check_schema(&self) -> Result<()> {
        let expected = FeatureSchema::column_names();
        if self.schema_version != SCHEMA_VERSION || self.features != expected {
            return Err(HeartError::SchemaMismatch {
                expected: format!("v{} {:?}", SCHEMA_VERSION, expected),
                found: format!("v{} {:?}", self.schema_version, self.features),
            });
        }
        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(HeartError::NoModel(path.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
