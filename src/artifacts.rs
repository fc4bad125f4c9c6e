//! Loading and holding the fitted model artifacts.
//!
//! An [`ArtifactStore`] is built once at startup and then only read. It owns
//! the classifier, the three label encoders and the optional feature scaler,
//! and is shared between request handlers behind an `Arc`.
//!
//! # Directory layout
//!
//! | File | Content | Required |
//! |------|---------|----------|
//! | `fertilizer_model.json` | [`ClassifierArtifact`] | yes |
//! | `soil_encoder.json` | [`LabelEncoder`] | yes |
//! | `crop_encoder.json` | [`LabelEncoder`] | yes |
//! | `fertilizer_encoder.json` | [`LabelEncoder`] | yes |
//! | `feature_scaler.json` | [`FeatureScaler`] | no |
//!
//! ```rust,no_run
//! use fertirec::ArtifactStore;
//!
//! let store = ArtifactStore::load("./models")?;
//! println!("soil types: {:?}", store.categories().soil_types);
//! # Ok::<(), fertirec::ArtifactError>(())
//! ```

use crate::classifier::{Classifier, ClassifierArtifact};
use crate::encoder::{FeatureEncoder, LabelEncoder};
use crate::error::ArtifactError;
use crate::reading::FEATURE_COUNT;
use crate::scaler::FeatureScaler;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

pub const MODEL_FILE: &str = "fertilizer_model.json";
pub const SOIL_ENCODER_FILE: &str = "soil_encoder.json";
pub const CROP_ENCODER_FILE: &str = "crop_encoder.json";
pub const FERTILIZER_ENCODER_FILE: &str = "fertilizer_encoder.json";
pub const SCALER_FILE: &str = "feature_scaler.json";

/// Valid soil and crop vocabularies, in encoder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    pub soil_types: Vec<String>,
    pub crop_types: Vec<String>,
}

/// Immutable set of fitted artifacts.
pub struct ArtifactStore {
    classifier: Box<dyn Classifier>,
    features: FeatureEncoder,
    fertilizer: LabelEncoder,
    scaler: Option<FeatureScaler>,
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("classifier", &self.classifier)
            .field("soil_classes", &self.features.soil().len())
            .field("crop_classes", &self.features.crop().len())
            .field("fertilizer_classes", &self.fertilizer.len())
            .field("scaler", &self.scaler.as_ref().map(FeatureScaler::kind))
            .finish()
    }
}

impl ArtifactStore {
    /// Load every artifact from `dir`.
    ///
    /// The four mandatory files must exist and parse. The scaler is optional:
    /// when its file is absent, or present but unreadable, features are passed
    /// to the classifier unscaled and a warning is logged for the latter.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let classifier: ClassifierArtifact = read_json(dir, MODEL_FILE)?;
        let soil: LabelEncoder = read_json(dir, SOIL_ENCODER_FILE)?;
        let crop: LabelEncoder = read_json(dir, CROP_ENCODER_FILE)?;
        let fertilizer: LabelEncoder = read_json(dir, FERTILIZER_ENCODER_FILE)?;

        let scaler = if dir.join(SCALER_FILE).exists() {
            match read_json::<FeatureScaler>(dir, SCALER_FILE)
                .and_then(|scaler| scaler.check().map(|()| scaler))
            {
                Ok(scaler) => Some(scaler),
                Err(err) => {
                    warn!(error = %err, "ignoring feature scaler, features will not be scaled");
                    None
                }
            }
        } else {
            None
        };

        info!(
            path = %dir.display(),
            model = classifier.kind(),
            soil_types = soil.len(),
            crop_types = crop.len(),
            fertilizers = fertilizer.len(),
            scaler = scaler.as_ref().map_or("none", FeatureScaler::kind),
            "loaded model artifacts"
        );

        Self::from_parts(Box::new(classifier), soil, crop, fertilizer, scaler)
    }

    /// Assemble a store from artifacts obtained some other way.
    ///
    /// Runs the classifier's structural checks, then checks that it takes the
    /// eight-column feature vector and that the scaler, if any, is well formed. Class codes the fertilizer
    /// encoder cannot decode are logged, since they only fail if predicted.
    pub fn from_parts(
        classifier: Box<dyn Classifier>,
        soil: LabelEncoder,
        crop: LabelEncoder,
        fertilizer: LabelEncoder,
        scaler: Option<FeatureScaler>,
    ) -> Result<Self, ArtifactError> {
        classifier.check()?;
        if classifier.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::invalid(
                "classifier",
                format!(
                    "expects {} features, the feature vector has {FEATURE_COUNT}",
                    classifier.n_features()
                ),
            ));
        }
        if let Some(scaler) = &scaler {
            scaler.check()?;
        }

        let undecodable: Vec<i64> = classifier
            .class_codes()
            .iter()
            .copied()
            .filter(|code| fertilizer.inverse_transform(*code).is_none())
            .collect();
        if !undecodable.is_empty() {
            warn!(
                codes = ?undecodable,
                "classifier can emit class codes the fertilizer encoder cannot decode"
            );
        }

        Ok(Self {
            classifier,
            features: FeatureEncoder::new(soil, crop),
            fertilizer,
            scaler,
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_encoder(&self) -> &FeatureEncoder {
        &self.features
    }

    pub fn fertilizer_encoder(&self) -> &LabelEncoder {
        &self.fertilizer
    }

    pub fn scaler(&self) -> Option<&FeatureScaler> {
        self.scaler.as_ref()
    }

    /// Soil and crop vocabularies, read straight from the encoders.
    pub fn categories(&self) -> CategoryList {
        CategoryList {
            soil_types: self.features.soil().classes().to_vec(),
            crop_types: self.features.crop().classes().to_vec(),
        }
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ArtifactError> {
    let path = dir.join(name);
    let bytes = std::fs::read(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NearestCentroid;

    fn labels(names: &[&str]) -> LabelEncoder {
        LabelEncoder::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn centroid(n_features: usize) -> Box<dyn Classifier> {
        Box::new(NearestCentroid {
            n_features,
            classes: vec![0, 1],
            centroids: vec![vec![0.0; n_features], vec![1.0; n_features]],
        })
    }

    #[test]
    fn from_parts_requires_eight_features() {
        let err = ArtifactStore::from_parts(
            centroid(5),
            labels(&["Sandy"]),
            labels(&["Wheat"]),
            labels(&["Urea", "DAP"]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { name: "classifier", .. }));
    }

    #[test]
    fn categories_follow_encoder_order() {
        let store = ArtifactStore::from_parts(
            centroid(8),
            labels(&["Sandy", "Black"]),
            labels(&["Wheat", "Maize"]),
            labels(&["Urea", "DAP"]),
            None,
        )
        .unwrap();
        let categories = store.categories();
        assert_eq!(categories.soil_types, vec!["Sandy", "Black"]);
        assert_eq!(categories.crop_types, vec!["Wheat", "Maize"]);
        assert!(store.scaler().is_none());
    }

    #[test]
    fn load_reports_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactStore::load(dir.path()).unwrap_err();
        match err {
            ArtifactError::Io { path, .. } => assert!(path.ends_with(MODEL_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
