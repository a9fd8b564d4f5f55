//! Label encoding for categorical columns

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::schema::FeatureSchema;
use crate::{HeartError, Result};

/// Maps each distinct category string to its index in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on observed values: distinct strings sorted lexicographically get `0..k-1`
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        LabelEncoder {
            classes: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of a category, `None` if it was never observed
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn mapping(&self) -> BTreeMap<String, usize> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect()
    }
}

/// One fitted encoder per categorical CSV column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoders {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl CategoryEncoders {
    /// Fit every categorical column of the schema.
    ///
    /// `raw` yields one row of string cells per record, in schema order.
    pub fn fit(raw: &[[String; FeatureSchema::DIM]]) -> Self {
        let encoders = FeatureSchema::categorical()
            .map(|(idx, feature)| {
                let encoder = LabelEncoder::fit(raw.iter().map(|row| row[idx].as_str()));
                (feature.column.to_string(), encoder)
            })
            .collect();

        CategoryEncoders { encoders }
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    /// Encode a categorical cell into its float index
    pub fn encode(&self, column: &str, value: &str) -> Result<f32> {
        let encoder = self
            .get(column)
            .ok_or_else(|| HeartError::InvalidInput(format!("{} is not categorical", column)))?;

        encoder.encode(value).map(|i| i as f32).ok_or_else(|| {
            HeartError::InvalidInput(format!(
                "unknown category {:?} for {} (known: {:?})",
                value,
                column,
                encoder.classes()
            ))
        })
    }

    /// Column → (category → index), as written to model metadata
    pub fn mappings(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        self.encoders
            .iter()
            .map(|(column, enc)| (column.clone(), enc.mapping()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LabelEncoder)> {
        self.encoders.iter()
    }
}
