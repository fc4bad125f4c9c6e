use super::{Classifier, Prediction, check_input};
use crate::error::{ArtifactError, ModelError};
use serde::{Deserialize, Serialize};

/// Nearest-centroid classifier. It has no probability model, so predictions
/// made with it carry no confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroid {
    pub n_features: usize,
    pub classes: Vec<i64>,
    /// One centroid per class, in `classes` order.
    pub centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    fn check_structure(&self) -> Result<(), String> {
        if self.n_features == 0 || self.classes.is_empty() {
            return Err("model has no features or no classes".into());
        }
        if self.centroids.len() != self.classes.len() {
            return Err(format!(
                "{} centroids for {} classes",
                self.centroids.len(),
                self.classes.len()
            ));
        }
        for (i, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != self.n_features || centroid.iter().any(|v| !v.is_finite()) {
                return Err(format!("centroid {i} is malformed"));
            }
        }
        Ok(())
    }
}

impl Classifier for NearestCentroid {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn class_codes(&self) -> &[i64] {
        &self.classes
    }

    fn has_probabilities(&self) -> bool {
        false
    }

    fn predict_with_proba(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        check_input(self.n_features, features)?;

        let mut best: Option<(usize, f64)> = None;
        for (i, centroid) in self.centroids.iter().enumerate() {
            if centroid.len() != features.len() {
                return Err(ModelError::Corrupt(format!("centroid {i} is malformed")));
            }
            let dist: f64 = centroid
                .iter()
                .zip(features)
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }

        let (idx, _) = best.ok_or_else(|| ModelError::Corrupt("model has no centroids".into()))?;
        let class_code = *self
            .classes
            .get(idx)
            .ok_or_else(|| ModelError::Corrupt(format!("no class for centroid {idx}")))?;
        Ok(Prediction {
            class_code,
            probabilities: None,
        })
    }

    fn check(&self) -> Result<(), ArtifactError> {
        self.check_structure().map_err(|reason| ArtifactError::invalid("classifier", reason))
    }
}
