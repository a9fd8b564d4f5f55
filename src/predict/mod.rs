//! Prediction and inference
//!
//! Load the trained model and turn request bodies into predictions.

pub mod inference;
pub mod request;

pub use inference::{format_prediction, Predictor};
pub use request::features_from_json;
