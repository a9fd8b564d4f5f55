//! Feature schema and encoding
//!
//! Converts raw patient records into model-ready vectors.

pub mod encoding;
pub mod schema;

pub use encoding::{CategoryEncoders, LabelEncoder};
pub use schema::{Feature, FeatureKind, FeatureSchema, FEATURES, SCHEMA_VERSION};
