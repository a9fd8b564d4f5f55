//! Burn Dataset implementation for patient records
//!
//! Provides encoded samples, the seeded train/test split and tensor batching.

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::records::RawRecord;
use crate::features::{CategoryEncoders, FeatureSchema};
use crate::{HeartError, Result, TrainingConfig};

/// A single encoded training example
#[derive(Debug, Clone, PartialEq)]
pub struct HeartSample {
    /// Model input in schema order
    pub features: [f32; FeatureSchema::DIM],
    /// 1.0 = heart disease, 0.0 = none
    pub label: f32,
}

/// In-memory dataset of encoded samples
#[derive(Debug, Clone, Default)]
pub struct HeartDataset {
    samples: Vec<HeartSample>,
}

impl HeartDataset {
    pub fn new(samples: Vec<HeartSample>) -> Self {
        HeartDataset { samples }
    }

    /// Encode raw rows with already fitted encoders
    pub fn from_records(records: &[RawRecord], encoders: &CategoryEncoders) -> Result<Self> {
        let samples = records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                record
                    .encode(encoders)
                    .map(|(features, label)| HeartSample { features, label })
                    .map_err(|e| HeartError::InvalidInput(format!("row {}: {}", row + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(HeartDataset { samples })
    }

    pub fn samples(&self) -> &[HeartSample] {
        &self.samples
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Seeded random split into (train, test).
    ///
    /// The test set gets `ceil(n * test_ratio)` samples.
    pub fn train_test_split(self, test_ratio: f64, seed: u64) -> (Self, Self) {
        let n = self.samples.len();
        let n_test = (n as f64 * test_ratio).ceil() as usize;
        let n_test = n_test.min(n);

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let pick = |idx: &[usize]| -> Vec<HeartSample> {
            idx.iter().map(|&i| self.samples[i].clone()).collect()
        };
        let test = pick(&indices[..n_test]);
        let train = pick(&indices[n_test..]);

        (HeartDataset::new(train), HeartDataset::new(test))
    }

    /// Split off the last `validation_ratio` of samples, in order, as (fit, validation)
    pub fn validation_split(self, validation_ratio: f64) -> (Self, Self) {
        let n = self.samples.len();
        let split_idx = (n as f64 * (1.0 - validation_ratio)) as usize;
        let mut fit = self.samples;
        let validation = fit.split_off(split_idx.min(n));

        (HeartDataset::new(fit), HeartDataset::new(validation))
    }

    /// Fraction of positive labels
    pub fn positive_rate(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let positives = self.samples.iter().filter(|s| s.label >= 0.5).count();
        positives as f32 / self.samples.len() as f32
    }
}

impl Dataset<HeartSample> for HeartDataset {
    fn get(&self, index: usize) -> Option<HeartSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Encoders plus the three datasets derived from one CSV file
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub encoders: CategoryEncoders,
    /// Rows the optimizer is fitted on
    pub train: HeartDataset,
    /// Held-out tail of the training rows, evaluated each epoch
    pub validation: HeartDataset,
    pub test: HeartDataset,
}

impl PreparedData {
    /// Fit encoders on every row, encode, then split train/validation/test
    pub fn from_records(records: &[RawRecord], config: &TrainingConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(HeartError::EmptyDataset("no rows in CSV".to_string()));
        }

        let raw: Vec<[String; FeatureSchema::DIM]> =
            records.iter().map(|r| r.cells.clone()).collect();
        let encoders = CategoryEncoders::fit(&raw);
        for (column, encoder) in encoders.iter() {
            log::debug!("{} classes: {:?}", column, encoder.classes());
        }

        let full = HeartDataset::from_records(records, &encoders)?;
        let (train, test) = full.train_test_split(config.test_ratio, config.seed);
        let (train, validation) = train.validation_split(config.validation_ratio);

        if train.is_empty() || validation.is_empty() || test.is_empty() {
            return Err(HeartError::EmptyDataset(format!(
                "{} rows give train={}, validation={}, test={}",
                records.len(),
                train.len(),
                validation.len(),
                test.len()
            )));
        }

        log::info!(
            "Split {} samples: train={}, validation={}, test={}",
            records.len(),
            train.len(),
            validation.len(),
            test.len()
        );

        Ok(PreparedData {
            encoders,
            train,
            validation,
            test,
        })
    }
}

/// Batch of samples for training
#[derive(Debug, Clone)]
pub struct HeartBatch<B: Backend> {
    /// Features: [batch, DIM]
    pub features: Tensor<B, 2>,
    /// Labels: [batch]
    pub labels: Tensor<B, 1>,
}

/// Batcher for creating training batches
#[derive(Clone)]
pub struct HeartBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> HeartBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        HeartBatcher { device }
    }
}

impl<B: Backend> Batcher<B, HeartSample, HeartBatch<B>> for HeartBatcher<B> {
    fn batch(&self, items: Vec<HeartSample>, _device: &B::Device) -> HeartBatch<B> {
        let batch_size = items.len();

        let mut feature_data = Vec::with_capacity(batch_size * FeatureSchema::DIM);
        let mut label_data = Vec::with_capacity(batch_size);

        for sample in &items {
            feature_data.extend_from_slice(&sample.features);
            label_data.push(sample.label);
        }

        let features = Tensor::<B, 1>::from_floats(feature_data.as_slice(), &self.device)
            .reshape([batch_size, FeatureSchema::DIM]);
        let labels = Tensor::<B, 1>::from_floats(label_data.as_slice(), &self.device);

        HeartBatch { features, labels }
    }
}
