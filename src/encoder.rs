//! Label encoders mapping category strings to the integer codes the
//! classifier was fitted on, and back.

use crate::error::{CategoryField, UnknownCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A fitted label encoder. A label's code is its position in `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderFile", into = "LabelEncoderFile")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

#[derive(Serialize, Deserialize)]
struct LabelEncoderFile {
    classes: Vec<String>,
}

impl TryFrom<LabelEncoderFile> for LabelEncoder {
    type Error = String;

    fn try_from(file: LabelEncoderFile) -> Result<Self, Self::Error> {
        LabelEncoder::new(file.classes)
    }
}

impl From<LabelEncoder> for LabelEncoderFile {
    fn from(encoder: LabelEncoder) -> Self {
        LabelEncoderFile {
            classes: encoder.classes,
        }
    }
}

impl LabelEncoder {
    /// Build an encoder over `classes`; rejects empty or duplicated lists.
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("class list is empty".into());
        }
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            let code = u32::try_from(code).map_err(|_| "too many classes".to_string())?;
            if index.insert(class.clone(), code).is_some() {
                return Err(format!("duplicate class {class:?}"));
            }
        }
        Ok(Self { classes, index })
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

    /// Code for `label`, or `None` when the encoder was never fitted on it.
    pub fn transform(&self, label: &str) -> Option<u32> {
        self.index.get(label).copied()
    }

    /// Label for `code`, or `None` when out of range.
    pub fn inverse_transform(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.classes.get(i))
            .map(String::as_str)
    }
}

/// Encodes the two categorical inputs with the soil and crop encoders.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    soil: LabelEncoder,
    crop: LabelEncoder,
}

impl FeatureEncoder {
    pub fn new(soil: LabelEncoder, crop: LabelEncoder) -> Self {
        Self { soil, crop }
    }

    /// Returns `(soil_code, crop_code)`.
    pub fn encode(&self, soil_type: &str, crop_type: &str) -> Result<(u32, u32), UnknownCategory> {
        let soil = self.soil.transform(soil_type).ok_or_else(|| UnknownCategory {
            field: CategoryField::Soil,
            value: soil_type.to_string(),
        })?;
        let crop = self.crop.transform(crop_type).ok_or_else(|| UnknownCategory {
            field: CategoryField::Crop,
            value: crop_type.to_string(),
        })?;
        Ok((soil, crop))
    }

    pub fn soil(&self) -> &LabelEncoder {
        &self.soil
    }

    pub fn crop(&self) -> &LabelEncoder {
        &self.crop
    }
}
