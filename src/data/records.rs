//! CSV ingestion of patient records
//!
//! Columns are looked up by header name through the feature schema, so the
//! file may carry extra columns or a different column order.

use std::io::Read;
use std::path::Path;

use crate::features::schema::{FeatureKind, FeatureSchema, FEATURES, LABEL_COLUMN};
use crate::features::CategoryEncoders;
use crate::{HeartError, Result};

/// One CSV row before encoding, cells in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub cells: [String; FeatureSchema::DIM],
    pub label: String,
}

impl RawRecord {
    /// Encode into the numeric model input and a 0/1 label
    pub fn encode(&self, encoders: &CategoryEncoders) -> Result<([f32; FeatureSchema::DIM], f32)> {
        let mut features = [0.0f32; FeatureSchema::DIM];

        for (i, feature) in FEATURES.iter().enumerate() {
            let cell = self.cells[i].trim();
            features[i] = match feature.kind {
                FeatureKind::Numeric => parse_number(feature.column, cell)?,
                FeatureKind::Categorical => encoders.encode(feature.column, cell)?,
            };
        }

        let label = parse_number(LABEL_COLUMN, self.label.trim())?;
        if label != 0.0 && label != 1.0 {
            return Err(HeartError::InvalidInput(format!(
                "{} must be 0 or 1, got {}",
                LABEL_COLUMN, self.label
            )));
        }

        Ok((features, label))
    }
}

fn parse_number(column: &str, cell: &str) -> Result<f32> {
    cell.parse::<f32>()
        .map_err(|e| HeartError::InvalidInput(format!("{}: cannot parse {:?}: {}", column, cell, e)))
}

/// Read all records from a CSV file
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        HeartError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let records = read_records(file)?;
    log::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read all records from any CSV source with a header row
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |column: &str| -> Result<usize> {
        headers.iter().position(|h| h == column).ok_or_else(|| {
            HeartError::InvalidInput(format!("CSV is missing column {}", column))
        })
    };

    let mut positions = [0usize; FeatureSchema::DIM];
    for (i, feature) in FEATURES.iter().enumerate() {
        positions[i] = find(feature.column)?;
    }
    let label_pos = find(LABEL_COLUMN)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cell = |pos: usize| row.get(pos).unwrap_or_default().to_string();

        records.push(RawRecord {
            cells: positions.map(|pos| cell(pos)),
            label: cell(label_pos),
        });
    }

    Ok(records)
}
