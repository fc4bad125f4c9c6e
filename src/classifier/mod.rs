//! Classifier artifacts.
//!
//! The pipeline talks to a classifier only through the [`Classifier`] trait,
//! so any fitted model that can map an eight-column feature vector to a class
//! code can be plugged into an [`ArtifactStore`](crate::ArtifactStore). The
//! serialized artifact formats shipped with the crate are collected in
//! [`ClassifierArtifact`].
//!
//! # Consistency of class and confidence
//!
//! [`Classifier::predict_with_proba`] returns the predicted class and the
//! probability vector from one evaluation. Implementations must derive the
//! class from that same vector (or, when they have no probability model,
//! return `None` for it), so the reported confidence always belongs to the
//! reported class.

mod centroid;
mod tree;

pub use centroid::NearestCentroid;
pub use tree::{DecisionTree, Node, RandomForest, Tree};

use crate::error::{ArtifactError, ModelError};
use serde::{Deserialize, Serialize};

/// Output of a single classifier evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Encoded fertilizer class, decoded by the fertilizer encoder.
    pub class_code: i64,
    /// Per-class probabilities in the classifier's class order, when the
    /// model supports probability estimates.
    pub probabilities: Option<Vec<f64>>,
}

impl Prediction {
    /// Maximum class probability, clamped to `[0, 1]`.
    pub fn confidence(&self) -> Option<f64> {
        self.probabilities
            .as_deref()
            .and_then(|p| p.iter().copied().reduce(f64::max))
            .map(|p| p.clamp(0.0, 1.0))
    }
}

/// A fitted, read-only classification model.
///
/// Implementations are shared across request handlers and must be safe to
/// evaluate concurrently.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Number of input columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// Class codes the model can emit, in probability-vector order.
    fn class_codes(&self) -> &[i64];

    /// Whether [`predict_with_proba`](Self::predict_with_proba) returns probabilities.
    fn has_probabilities(&self) -> bool;

    fn predict_with_proba(&self, features: &[f64]) -> Result<Prediction, ModelError>;

    /// Structural checks, run once before the model is served.
    ///
    /// A model that passes must never loop or index out of bounds in
    /// [`predict_with_proba`](Self::predict_with_proba).
    fn check(&self) -> Result<(), ArtifactError>;
}

/// Serialized classifier formats, selected by the `kind` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
    NearestCentroid(NearestCentroid),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::RandomForest(_) => "random_forest",
            ClassifierArtifact::DecisionTree(_) => "decision_tree",
            ClassifierArtifact::NearestCentroid(_) => "nearest_centroid",
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierArtifact::RandomForest(model) => model,
            ClassifierArtifact::DecisionTree(model) => model,
            ClassifierArtifact::NearestCentroid(model) => model,
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn class_codes(&self) -> &[i64] {
        self.inner().class_codes()
    }

    fn has_probabilities(&self) -> bool {
        self.inner().has_probabilities()
    }

    fn predict_with_proba(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        self.inner().predict_with_proba(features)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        self.inner().check()
    }
}

pub(crate) fn check_input(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::FeatureCount {
            expected,
            actual: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFiniteFeature { index });
    }
    Ok(())
}

/// Index of the first maximum; ties resolve to the lowest index.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
