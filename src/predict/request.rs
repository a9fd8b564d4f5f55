//! Decoding of `/predict` request bodies into model input

use serde_json::Value;

use crate::features::{FeatureSchema, FEATURES};
use crate::{HeartError, Result};

/// Build the model input vector from a JSON object.
///
/// Every schema key must be present with a numeric value; nothing is
/// defaulted. Categorical features are expected pre-encoded. Extra keys
/// are ignored.
pub fn features_from_json(body: &Value) -> Result<[f32; FeatureSchema::DIM]> {
    let object = body
        .as_object()
        .ok_or_else(|| HeartError::InvalidInput("request body must be a JSON object".to_string()))?;

    let mut features = [0.0f32; FeatureSchema::DIM];
    for (slot, feature) in features.iter_mut().zip(FEATURES.iter()) {
        let value = object.get(feature.json_key).ok_or_else(|| {
            HeartError::InvalidInput(format!("missing field `{}`", feature.json_key))
        })?;

        let number = value.as_f64().ok_or_else(|| {
            HeartError::InvalidInput(format!(
                "field `{}` must be a number, got {}",
                feature.json_key, value
            ))
        })? as f32;

        // Values beyond the f32 range narrow to infinity
        if !number.is_finite() {
            return Err(HeartError::InvalidInput(format!(
                "field `{}` is out of range: {}",
                feature.json_key, value
            )));
        }
        *slot = number;
    }

    Ok(features)
}

#[cfg(test)]
pub(crate) fn sample_request() -> Value {
    serde_json::json!({
        "age": 40,
        "sex": 1,
        "chestPainType": 1,
        "restingBP": 140,
        "cholesterol": 289,
        "fastingBS": 0,
        "restingECG": 1,
        "maxHR": 172,
        "exerciseAngina": 0,
        "oldPeak": 0.0,
        "stSlope": 2
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_in_schema_order() {
        let features = features_from_json(&sample_request()).unwrap();
        assert_eq!(
            features,
            [40.0, 1.0, 1.0, 140.0, 289.0, 0.0, 1.0, 172.0, 0.0, 0.0, 2.0]
        );
    }

    #[test]
    fn test_negative_oldpeak_and_extra_keys() {
        let mut body = sample_request();
        body["oldPeak"] = serde_json::json!(-1.5);
        body["note"] = serde_json::json!("ignored");

        let features = features_from_json(&body).unwrap();
        assert_eq!(features[9], -1.5);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut body = sample_request();
        body.as_object_mut().unwrap().remove("maxHR");

        let err = features_from_json(&body).unwrap_err();
        assert!(err.to_string().contains("maxHR"), "{}", err);
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        for bad in [serde_json::json!("M"), Value::Null, serde_json::json!([1])] {
            let mut body = sample_request();
            body["sex"] = bad;
            assert!(matches!(
                features_from_json(&body),
                Err(HeartError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        for (key, bad) in [("cholesterol", 1e39), ("age", -1e39)] {
            let mut body = sample_request();
            body[key] = serde_json::json!(bad);

            let err = features_from_json(&body).unwrap_err();
            assert!(matches!(err, HeartError::InvalidInput(_)));
            assert!(err.to_string().contains(key), "{}", err);
        }
    }

    #[test]
    fn test_largest_f32_is_accepted() {
        let mut body = sample_request();
        body["cholesterol"] = serde_json::json!(f32::MAX as f64);
        assert_eq!(features_from_json(&body).unwrap()[4], f32::MAX);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(features_from_json(&serde_json::json!([1, 2, 3])).is_err());
    }
}
