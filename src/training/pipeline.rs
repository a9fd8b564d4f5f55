//! End-to-end training run: CSV in, model files out

use burn::module::AutodiffModule;
use burn::tensor::backend::AutodiffBackend;

use super::evaluation::ClassificationMetrics;
use super::metrics::TrainingHistory;
use super::trainer::{predict_dataset, Trainer};
use crate::data::{load_records, PreparedData};
use crate::features::FeatureSchema;
use crate::model::{ModelMetadata, ModelPaths};
use crate::{Config, Result};

/// Results of a finished training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub history: TrainingHistory,
    pub test_metrics: ClassificationMetrics,
    /// Column name → normalized importance, schema order
    pub feature_importance: Vec<(String, f32)>,
    pub paths: ModelPaths,
}

/// Read the configured CSV, then train, evaluate and save
pub fn run_training<B: AutodiffBackend>(config: &Config, device: B::Device) -> Result<TrainingOutcome> {
    let records = load_records(&config.data.dataset_path)?;
    let prepared = PreparedData::from_records(&records, &config.training)?;
    train_and_save::<B>(config, prepared, device)
}

/// Train on prepared data, evaluate on its test set and overwrite the model files
pub fn train_and_save<B: AutodiffBackend>(
    config: &Config,
    prepared: PreparedData,
    device: B::Device,
) -> Result<TrainingOutcome> {
    let PreparedData {
        encoders,
        train,
        validation,
        test,
    } = prepared;

    log::info!(
        "Train positive rate: {:.1}%, test positive rate: {:.1}%",
        train.positive_rate() * 100.0,
        test.positive_rate() * 100.0
    );

    let trainer = Trainer::<B>::new(device.clone(), config.training.clone());
    let (model, history) = trainer.train(train, validation)?;

    let model = model.valid();
    let importance = model.feature_importance()?;
    let feature_importance: Vec<(String, f32)> = FeatureSchema::column_names()
        .into_iter()
        .zip(importance.iter().copied())
        .collect();

    let (probs, targets) = predict_dataset(&model, &test, &device)?;
    let test_metrics = ClassificationMetrics::from_predictions(&probs, &targets);
    log::info!(
        "Test accuracy: {:.2}% on {} samples",
        test_metrics.accuracy * 100.0,
        test.len()
    );

    let paths = ModelPaths::new(config.data.model_path.clone());
    paths.ensure_parent()?;
    model.save(paths.base())?;

    let metadata = ModelMetadata::new(
        &config.training,
        encoders.mappings(),
        &importance,
        test_metrics,
    );
    metadata.save(&paths.metadata_file())?;
    log::info!(
        "Saved model to {} and {}",
        paths.weights_file(),
        paths.metadata_file()
    );

    Ok(TrainingOutcome {
        history,
        test_metrics,
        feature_importance,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{read_records, SAMPLE_CSV};
    use crate::model::{HeartNet, HeartNetConfig};
    use crate::DataConfig;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<TestBackend>;

    #[test]
    fn test_train_and_save_writes_loadable_model() {
        let dir = std::env::temp_dir().join(format!("heart-pipeline-{}", std::process::id()));
        let base = dir.join("model").join("heart_model");

        let mut config = Config {
            data: DataConfig {
                dataset_path: "unused.csv".to_string(),
                model_path: base.to_str().unwrap().to_string(),
            },
            ..Config::default()
        };
        config.training.epochs = 2;
        config.training.batch_size = 8;

        let records = read_records(SAMPLE_CSV.as_bytes()).unwrap();
        let prepared = PreparedData::from_records(&records, &config.training).unwrap();
        let outcome =
            train_and_save::<TestAutodiffBackend>(&config, prepared, Default::default()).unwrap();

        assert_eq!(outcome.history.epochs(), 2);
        assert_eq!(outcome.test_metrics.confusion.total(), 4);
        assert_eq!(outcome.feature_importance.len(), FeatureSchema::DIM);

        let metadata = ModelMetadata::load(&outcome.paths.metadata_file()).unwrap();
        metadata.check_schema().unwrap();
        assert_eq!(metadata.epochs, 2);
        assert_eq!(metadata.category_mappings["Sex"]["F"], 0);
        assert_eq!(metadata.category_mappings["Sex"]["M"], 1);

        let net_config = HeartNetConfig::default();
        assert!(
            HeartNet::<TestBackend>::load(&Default::default(), outcome.paths.base(), &net_config)
                .is_ok()
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_dataset_fails() {
        let mut config = Config::default();
        config.data.dataset_path = "/nonexistent/heart.csv".to_string();
        assert!(run_training::<TestAutodiffBackend>(&config, Default::default()).is_err());
    }
}
