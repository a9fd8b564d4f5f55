//! HTTP prediction service

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, ServeBackend};

use tokio::net::TcpListener;

use crate::{Result, ServerConfig};

/// Bind the configured address and serve until the process is stopped
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("Prediction service listening on http://{}", addr);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
