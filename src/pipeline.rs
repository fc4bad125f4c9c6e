//! The request-to-prediction pipeline.
//!
//! [`Predictor::predict`] runs, in order:
//!
//! 1. payload validation (all violations collected),
//! 2. soil/crop encoding,
//! 3. feature-vector assembly in the fitted column order,
//! 4. scaling, when the store carries a scaler,
//! 5. a single combined class + probability evaluation,
//! 6. decoding the class code to a fertilizer label,
//! 7. the knowledge-table lookup.
//!
//! Steps 1 and 2 fail with client errors; anything after that fails with
//! [`PredictError::PredictionFailed`].

use crate::artifacts::ArtifactStore;
use crate::error::{ModelError, PredictError};
use crate::knowledge::{self, FertilizerDetails, KnowledgeEntry};
use crate::reading::{FeatureVector, SensorReading};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A recommendation returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub fertilizer: String,
    /// Maximum class probability; `None` when the classifier has no
    /// probability model.
    pub confidence: Option<f64>,
    pub details: &'static FertilizerDetails,
    /// Whether `details` came from the generic fallback record.
    #[serde(skip)]
    pub fallback_details: bool,
}

/// Runs predictions against a shared, immutable [`ArtifactStore`].
#[derive(Debug, Clone)]
pub struct Predictor {
    store: Arc<ArtifactStore>,
}

impl Predictor {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Produce a recommendation for a raw JSON payload.
    pub fn predict(&self, payload: &Value) -> Result<PredictionResult, PredictError> {
        let reading = SensorReading::from_payload(payload)?;
        self.predict_reading(&reading)
    }

    /// Produce a recommendation for an already validated reading.
    pub fn predict_reading(&self, reading: &SensorReading) -> Result<PredictionResult, PredictError> {
        let (soil_code, crop_code) = self
            .store
            .feature_encoder()
            .encode(&reading.soil_type, &reading.crop_type)?;

        let features = FeatureVector::assemble(reading, soil_code, crop_code);
        let result = self.classify(&features)?;

        debug!(
            fertilizer = %result.fertilizer,
            confidence = ?result.confidence,
            fallback_details = result.fallback_details,
            "prediction complete"
        );
        Ok(result)
    }

    fn classify(&self, features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        let scaled;
        let input = match self.store.scaler() {
            Some(scaler) => {
                scaled = scaler.transform(features)?;
                &scaled
            }
            None => features,
        };

        let prediction = self.store.classifier().predict_with_proba(input.as_slice())?;
        let confidence = prediction.confidence();

        let fertilizer = self
            .store
            .fertilizer_encoder()
            .inverse_transform(prediction.class_code)
            .ok_or(ModelError::UnknownClassCode(prediction.class_code))?
            .to_string();

        let entry = knowledge::lookup(&fertilizer);
        Ok(PredictionResult {
            fertilizer,
            confidence,
            details: entry.details(),
            fallback_details: matches!(entry, KnowledgeEntry::Fallback(_)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, Node, RandomForest, Tree};
    use crate::encoder::LabelEncoder;
    use crate::error::CategoryField;
    use crate::scaler::FeatureScaler;
    use serde_json::json;

    fn labels(names: &[&str]) -> LabelEncoder {
        LabelEncoder::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    /// Splits on nitrogen (column 5): <= 100 → class 0, else class 1.
    fn nitrogen_forest() -> RandomForest {
        RandomForest {
            n_features: 8,
            classes: vec![0, 1],
            trees: vec![Tree {
                nodes: vec![
                    Node::Split {
                        feature: 5,
                        threshold: 100.0,
                        left: 1,
                        right: 2,
                    },
                    Node::Leaf {
                        value: vec![4.0, 1.0],
                    },
                    Node::Leaf {
                        value: vec![0.0, 2.0],
                    },
                ],
            }],
        }
    }

    fn predictor(classifier: Box<dyn Classifier>, scaler: Option<FeatureScaler>) -> Predictor {
        let store = ArtifactStore::from_parts(
            classifier,
            labels(&["Loamy", "Sandy"]),
            labels(&["Maize", "Wheat"]),
            labels(&["Mystery Mix", "Urea"]),
            scaler,
        )
        .unwrap();
        Predictor::new(Arc::new(store))
    }

    fn payload(nitrogen: f64) -> Value {
        json!({
            "temperature": 30, "humidity": 60, "moisture": 40,
            "soil_type": "Sandy", "crop_type": "Wheat",
            "nitrogen": nitrogen, "potassium": 50, "phosphorous": 50
        })
    }

    #[test]
    fn predicts_label_confidence_and_details() {
        let predictor = predictor(Box::new(nitrogen_forest()), None);
        let result = predictor.predict(&payload(150.0)).unwrap();
        assert_eq!(result.fertilizer, "Urea");
        assert_eq!(result.confidence, Some(1.0));
        assert!(!result.fallback_details);
        assert_eq!(result.details.application_rate, "100-200 kg/ha");
    }

    #[test]
    fn unknown_label_uses_fallback_details() {
        let predictor = predictor(Box::new(nitrogen_forest()), None);
        let result = predictor.predict(&payload(50.0)).unwrap();
        assert_eq!(result.fertilizer, "Mystery Mix");
        assert_eq!(result.confidence, Some(0.8));
        assert!(result.fallback_details);
        assert_eq!(result.details.description, "Specialized fertilizer blend");
    }

    #[test]
    fn scaler_is_applied_before_classification() {
        // Scaling nitrogen 50 by 1/10 and shifting by 200 pushes it right of the split.
        let mut min = vec![0.0; 8];
        let mut scale = vec![1.0; 8];
        min[5] = 200.0;
        scale[5] = 0.1;
        let predictor = predictor(
            Box::new(nitrogen_forest()),
            Some(FeatureScaler::MinMax { min, scale }),
        );
        assert_eq!(predictor.predict(&payload(50.0)).unwrap().fertilizer, "Urea");
    }

    #[test]
    fn failure_classes_stay_distinct() {
        let predictor = predictor(Box::new(nitrogen_forest()), None);

        let err = predictor.predict(&payload(301.0)).unwrap_err();
        assert_eq!(
            err,
            PredictError::Validation(vec!["Nitrogen must be between 0 and 300 mg/kg".into()])
        );

        let mut moon = payload(10.0);
        moon["soil_type"] = json!("Moon Dust");
        match predictor.predict(&moon).unwrap_err() {
            PredictError::InvalidCategory(err) => assert_eq!(err.field, CategoryField::Soil),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn undecodable_class_code_is_a_prediction_failure() {
        let mut forest = nitrogen_forest();
        forest.classes = vec![0, 9];
        let predictor = predictor(Box::new(forest), None);
        let err = predictor.predict(&payload(150.0)).unwrap_err();
        assert!(matches!(err, PredictError::PredictionFailed(ref msg) if msg.contains("class code 9")));
    }
}
