//! Fertilizer recommendation inference.
//!
//! This crate turns agronomic sensor readings plus soil and crop labels into a
//! fertilizer recommendation with a confidence score and descriptive notes.
//! The fitted artifacts (classifier, label encoders, optional scaler) are
//! loaded once into an immutable [`ArtifactStore`] and shared by reference
//! with every request.
//!
//! ```rust,no_run
//! use fertirec::{ArtifactStore, Predictor};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let store = Arc::new(ArtifactStore::load("./models")?);
//! let predictor = Predictor::new(store);
//!
//! let result = predictor.predict(&json!({
//!     "temperature": 30, "humidity": 60, "moisture": 40,
//!     "soil_type": "Sandy", "crop_type": "Wheat",
//!     "nitrogen": 50, "potassium": 50, "phosphorous": 50
//! }));
//! match result {
//!     Ok(rec) => println!("{} ({:?})", rec.fertilizer, rec.confidence),
//!     Err(err) => eprintln!("{err}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The HTTP service is behind the `server` feature (on by default); see
//! [`server`].

pub mod artifacts;
pub mod classifier;
pub mod encoder;
pub mod error;
pub mod knowledge;
pub mod pipeline;
pub mod reading;
pub mod scaler;

#[cfg(feature = "server")]
pub mod server;

pub use artifacts::{ArtifactStore, CategoryList};
pub use classifier::{
    Classifier, ClassifierArtifact, DecisionTree, NearestCentroid, Node, Prediction, RandomForest,
    Tree,
};
pub use encoder::{FeatureEncoder, LabelEncoder};
pub use error::{ArtifactError, CategoryField, ModelError, PredictError, UnknownCategory};
pub use knowledge::{FertilizerDetails, KnowledgeEntry};
pub use pipeline::{PredictionResult, Predictor};
pub use reading::{FEATURE_COUNT, FeatureVector, REQUIRED_FIELDS, SensorReading, validate};
pub use scaler::FeatureScaler;
