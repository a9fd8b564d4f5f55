//! Heart disease prediction CLI
//!
//! Trains the dense classifier from a CSV file and runs one-off predictions
//! against the saved model.

use clap::{Parser, Subcommand};
use heart::{Config, Result};

#[derive(Parser)]
#[command(name = "heart")]
#[command(about = "Heart disease prediction using a dense neural network", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier and save it to the configured model path
    Train {
        /// Override number of epochs
        #[arg(long)]
        epochs: Option<usize>,
    },
    /// Predict from a JSON object with the eleven encoded features
    Predict {
        /// e.g. '{"age": 40, "sex": 1, ...}'
        input: String,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show model information
    Info,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Run command
    let result = match cli.command {
        Commands::Train { epochs } => commands::train(config, epochs),
        Commands::Predict { input } => commands::predict(&config, &input),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use heart::model::{ModelMetadata, ModelPaths};
    use heart::predict::{features_from_json, format_prediction, Predictor};
    use heart::training::{report, run_training};

    type MyBackend = NdArray<f32>;
    type MyAutodiffBackend = Autodiff<MyBackend>;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("model")?;
        println!("Created model/ directory");

        println!("\nNext steps:");
        println!("  1. Place the heart disease CSV at {}", config.data.dataset_path);
        println!("  2. Run 'heart train' to train the model");
        println!("  3. Run 'heart-server' to serve predictions on port {}", config.server.port);

        Ok(())
    }

    pub fn train(mut config: Config, epochs: Option<usize>) -> Result<()> {
        if let Some(epochs) = epochs {
            config.training.epochs = epochs;
        }

        println!("Training on {}...", config.data.dataset_path);
        let outcome = run_training::<MyAutodiffBackend>(&config, Default::default())?;

        println!();
        println!("{}", report::render_feature_importance(&outcome.feature_importance));
        println!("{}", report::render_accuracy_curves(&outcome.history));
        println!("{}", report::render_confusion_matrix(&outcome.test_metrics.confusion));
        println!("{}", outcome.test_metrics);
        println!();
        println!("Model saved to {}", outcome.paths.weights_file());

        Ok(())
    }

    pub fn predict(config: &Config, input: &str) -> Result<()> {
        let body: serde_json::Value = serde_json::from_str(input)?;
        let features = features_from_json(&body)?;

        let paths = ModelPaths::new(config.data.model_path.clone());
        let predictor = Predictor::<MyBackend>::load(&paths, Default::default())?;
        let probability = predictor.predict(&features)?;

        println!("{}", format_prediction(probability));
        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let paths = ModelPaths::new(config.data.model_path.clone());
        let metadata = ModelMetadata::load(&paths.metadata_file())?;

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Weights:        {}", paths.weights_file());
        println!("  Schema version: {}", metadata.schema_version);
        println!("  Trained at:     {}", metadata.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("  Epochs:         {}", metadata.epochs);
        println!("  Batch size:     {}", metadata.batch_size);
        println!("  Learning rate:  {}", metadata.learning_rate);
        println!("  Dropout:        {}", metadata.dropout);
        println!("  Seed:           {}", metadata.seed);

        println!("\nCategory encodings");
        for (column, mapping) in &metadata.category_mappings {
            let pairs: Vec<String> = mapping
                .iter()
                .map(|(category, index)| format!("{}={}", category, index))
                .collect();
            println!("  {:<15} {}", column, pairs.join(", "));
        }

        println!();
        println!("{}", report::render_feature_importance(&metadata.feature_importance));
        println!("Test set");
        println!("{}", metadata.test_metrics);

        if let Err(e) = metadata.check_schema() {
            println!("\nWarning: {}", e);
        }

        Ok(())
    }
}
