use std::sync::Arc;

use burn::backend::NdArray;

use crate::predict::Predictor;

/// Backend the service runs inference on
pub type ServeBackend = NdArray<f32>;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub predictor: Arc<Predictor<ServeBackend>>,
}

impl AppState {
    pub fn new(predictor: Predictor<ServeBackend>) -> Self {
        AppState {
            predictor: Arc::new(predictor),
        }
    }
}
