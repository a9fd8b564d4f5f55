//! Heart disease prediction service
//!
//! Loads the trained model once and serves `POST /predict`.

use clap::Parser;
use heart::model::ModelPaths;
use heart::predict::Predictor;
use heart::server::{self, AppState, ServeBackend};
use heart::{Config, Result};

#[derive(Parser)]
#[command(name = "heart-server")]
#[command(about = "Serve heart disease predictions over HTTP", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let paths = ModelPaths::new(config.data.model_path.clone());
    let predictor = Predictor::<ServeBackend>::load(&paths, Default::default())?;

    if !predictor.metadata().category_mappings.is_empty() {
        log::warn!(
            "Requests must carry categorical features already label encoded; \
             run `heart model info` for the mappings"
        );
    }

    server::serve(&config.server, AppState::new(predictor)).await
}
