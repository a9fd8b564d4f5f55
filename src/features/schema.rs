//! Feature schema shared by training and serving
//!
//! The position of a feature in [`FEATURES`] is its column in the model
//! input. Both the CSV dataset builder and the HTTP request decoder read
//! this table, so the two can never disagree on ordering.

use serde::{Deserialize, Serialize};

/// Bump whenever a feature is added, removed, renamed or reordered.
pub const SCHEMA_VERSION: u32 = 1;

/// CSV column holding the binary label
pub const LABEL_COLUMN: &str = "HeartDisease";

/// How a feature's raw value becomes a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Parsed directly as a number
    Numeric,
    /// String category, label encoded to `0..k-1`
    Categorical,
}

/// One input feature of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    /// Column header in the training CSV
    pub column: &'static str,
    /// Key in the `/predict` JSON body
    pub json_key: &'static str,
    pub kind: FeatureKind,
}

const fn numeric(column: &'static str, json_key: &'static str) -> Feature {
    Feature {
        column,
        json_key,
        kind: FeatureKind::Numeric,
    }
}

const fn categorical(column: &'static str, json_key: &'static str) -> Feature {
    Feature {
        column,
        json_key,
        kind: FeatureKind::Categorical,
    }
}

/// Ordered model inputs
pub const FEATURES: [Feature; FeatureSchema::DIM] = [
    numeric("Age", "age"),
    categorical("Sex", "sex"),
    categorical("ChestPainType", "chestPainType"),
    numeric("RestingBP", "restingBP"),
    numeric("Cholesterol", "cholesterol"),
    numeric("FastingBS", "fastingBS"),
    categorical("RestingECG", "restingECG"),
    numeric("MaxHR", "maxHR"),
    categorical("ExerciseAngina", "exerciseAngina"),
    numeric("Oldpeak", "oldPeak"),
    categorical("ST_Slope", "stSlope"),
];

/// Accessors over [`FEATURES`]
pub struct FeatureSchema;

impl FeatureSchema {
    /// Number of model inputs
    pub const DIM: usize = 11;

    pub fn categorical() -> impl Iterator<Item = (usize, &'static Feature)> {
        FEATURES
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == FeatureKind::Categorical)
    }

    /// Ordered CSV column names, as recorded in model metadata
    pub fn column_names() -> Vec<String> {
        FEATURES.iter().map(|f| f.column.to_string()).collect()
    }
}
