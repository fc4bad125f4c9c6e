//! Fitted feature scalers applied to the feature vector before classification.

use crate::error::{ArtifactError, ModelError};
use crate::reading::{FEATURE_COUNT, FeatureVector};
use serde::{Deserialize, Serialize};

/// A fitted per-column transform.
///
/// ```json
/// { "kind": "standard", "mean": [..8 values..], "scale": [..8 values..] }
/// { "kind": "min_max",  "min":  [..8 values..], "scale": [..8 values..] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureScaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl FeatureScaler {
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureScaler::Standard { .. } => "standard",
            FeatureScaler::MinMax { .. } => "min_max",
        }
    }

    pub(crate) fn check(&self) -> Result<(), ArtifactError> {
        let (offset, scale) = match self {
            FeatureScaler::Standard { mean, scale } => (mean, scale),
            FeatureScaler::MinMax { min, scale } => (min, scale),
        };
        if offset.len() != FEATURE_COUNT || scale.len() != FEATURE_COUNT {
            return Err(ArtifactError::invalid(
                "feature_scaler",
                format!(
                    "expected {FEATURE_COUNT} columns, got {} offsets and {} scales",
                    offset.len(),
                    scale.len()
                ),
            ));
        }
        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err(ArtifactError::invalid("feature_scaler", "non-finite parameter"));
        }
        if matches!(self, FeatureScaler::Standard { .. }) && scale.contains(&0.0) {
            return Err(ArtifactError::invalid("feature_scaler", "zero scale"));
        }
        Ok(())
    }

    /// Return a scaled copy of `features`.
    pub fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError> {
        let mut scaled = *features;
        let values = scaled.as_mut_slice();
        match self {
            FeatureScaler::Standard { mean, scale } => {
                for ((x, m), s) in values.iter_mut().zip(mean).zip(scale) {
                    *x = (*x - m) / s;
                }
            }
            FeatureScaler::MinMax { min, scale } => {
                for ((x, m), s) in values.iter_mut().zip(min).zip(scale) {
                    *x = *x * s + m;
                }
            }
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteFeature { index });
        }
        Ok(scaled)
    }
}
