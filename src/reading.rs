//! Sensor readings, payload validation and feature-vector assembly.
//!
//! A request payload is an arbitrary JSON value. [`validate`] checks it for
//! presence of every required field and then for numeric ranges, and
//! [`SensorReading::from_payload`] turns an accepted payload into a typed
//! reading. The classifier consumes a [`FeatureVector`], whose column order is
//! fixed by the fitted artifact.

use crate::error::{CategoryField, PredictError, UnknownCategory};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload keys that must all be present, in reporting order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "temperature",
    "humidity",
    "moisture",
    "soil_type",
    "crop_type",
    "nitrogen",
    "potassium",
    "phosphorous",
];

/// Number of columns the classifier is fitted on.
pub const FEATURE_COUNT: usize = 8;

struct RangeRule {
    field: &'static str,
    min: f64,
    max: f64,
    message: &'static str,
}

const RANGE_RULES: [RangeRule; 6] = [
    RangeRule {
        field: "temperature",
        min: 0.0,
        max: 60.0,
        message: "Temperature must be between 0 and 60 C",
    },
    RangeRule {
        field: "humidity",
        min: 0.0,
        max: 100.0,
        message: "Humidity must be between 0 and 100 %",
    },
    RangeRule {
        field: "moisture",
        min: 0.0,
        max: 100.0,
        message: "Moisture must be between 0 and 100 %",
    },
    RangeRule {
        field: "nitrogen",
        min: 0.0,
        max: 300.0,
        message: "Nitrogen must be between 0 and 300 mg/kg",
    },
    RangeRule {
        field: "potassium",
        min: 0.0,
        max: 300.0,
        message: "Potassium must be between 0 and 300 mg/kg",
    },
    RangeRule {
        field: "phosphorous",
        min: 0.0,
        max: 300.0,
        message: "Phosphorous must be between 0 and 300 mg/kg",
    },
];

/// Check a raw payload and return every problem found.
///
/// Missing keys short-circuit: the result is a single message naming all of
/// them and no range checks run. Otherwise each numeric field is checked and
/// all violations are returned. A value that is not a JSON number fails its
/// field's range rule. `soil_type` and `crop_type` are left to the encoder.
///
/// A payload that is not a JSON object is treated as an empty mapping.
///
/// ```rust
/// use serde_json::json;
///
/// let errors = fertirec::validate(&json!({ "temperature": 30 }));
/// assert_eq!(errors.len(), 1);
/// assert!(errors[0].starts_with("Missing field(s): humidity, moisture"));
/// ```
pub fn validate(payload: &Value) -> Vec<String> {
    let fields = payload.as_object();
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| fields.is_none_or(|map| !map.contains_key(*key)))
        .collect();

    if !missing.is_empty() {
        return vec![format!("Missing field(s): {}", missing.join(", "))];
    }

    RANGE_RULES
        .iter()
        .filter(|rule| {
            let value = payload.get(rule.field).and_then(numeric);
            !value.is_some_and(|v| (rule.min..=rule.max).contains(&v))
        })
        .map(|rule| rule.message.to_string())
        .collect()
}

/// Numeric reading of a JSON value. Booleans count as 0 and 1.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        other => other.as_f64(),
    }
}

/// One validated request: five numeric readings plus two category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Air temperature, °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
    /// Soil moisture, %.
    pub moisture: f64,
    pub soil_type: String,
    pub crop_type: String,
    /// mg/kg
    pub nitrogen: f64,
    /// mg/kg
    pub potassium: f64,
    /// mg/kg
    pub phosphorous: f64,
}

impl SensorReading {
    /// Validate `payload` and build a reading from it.
    ///
    /// Fails with [`PredictError::Validation`] carrying the full error list,
    /// or with [`PredictError::InvalidCategory`] when a label is not a string
    /// (such a value can never be in an encoder's vocabulary).
    pub fn from_payload(payload: &Value) -> Result<Self, PredictError> {
        let errors = validate(payload);
        if !errors.is_empty() {
            return Err(PredictError::Validation(errors));
        }

        let number = |key: &str| payload.get(key).and_then(numeric).unwrap_or_default();

        Ok(Self {
            temperature: number("temperature"),
            humidity: number("humidity"),
            moisture: number("moisture"),
            soil_type: label(payload, CategoryField::Soil)?,
            crop_type: label(payload, CategoryField::Crop)?,
            nitrogen: number("nitrogen"),
            potassium: number("potassium"),
            phosphorous: number("phosphorous"),
        })
    }
}

fn label(payload: &Value, field: CategoryField) -> Result<String, UnknownCategory> {
    match payload.get(field.as_str()) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(UnknownCategory {
            field,
            value: other.map(Value::to_string).unwrap_or_default(),
        }),
    }
}

/// Classifier input in the column order the artifact was fitted with:
/// temperature, humidity, moisture, soil code, crop code, nitrogen,
/// potassium, phosphorous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn assemble(reading: &SensorReading, soil_code: u32, crop_code: u32) -> Self {
        Self([
            reading.temperature,
            reading.humidity,
            reading.moisture,
            f64::from(soil_code),
            f64::from(crop_code),
            reading.nitrogen,
            reading.potassium,
            reading.phosphorous,
        ])
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }
}
