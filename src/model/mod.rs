//! Neural network architecture
//!
//! The fixed-topology dense classifier and the metadata saved alongside it.

pub mod heart_net;
pub mod metadata;

pub use heart_net::{HeartNet, HeartNetConfig};
pub use metadata::{ModelMetadata, ModelPaths};
