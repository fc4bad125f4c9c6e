//! Error types produced by the fertirec core.
//!
//! The prediction path has exactly three failure classes, and callers map
//! each to a different response:
//!
//! | Error | Class | Cause |
//! |-------|-------|-------|
//! | [`PredictError::Validation`] | client | missing fields or out-of-range readings |
//! | [`PredictError::InvalidCategory`] | client | soil/crop label outside the trained vocabulary |
//! | [`PredictError::PredictionFailed`] | server | scaling, classification or decoding failed |
//!
//! Loading artifacts has its own error surface, [`ArtifactError`], which is
//! only ever seen at startup.
//!
//! ```rust
//! use fertirec::PredictError;
//!
//! fn to_http_status(error: &PredictError) -> u16 {
//!     match error {
//!         PredictError::PredictionFailed(_) => 500,
//!         _ => 400,
//!     }
//! }
//!
//! assert_eq!(to_http_status(&PredictError::Validation(vec![])), 400);
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Which categorical input failed to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Soil,
    Crop,
}

impl CategoryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryField::Soil => "soil_type",
            CategoryField::Crop => "crop_type",
        }
    }
}

impl std::fmt::Display for CategoryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A soil or crop label that the loaded encoder was never fitted on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {field} category: {value}")]
pub struct UnknownCategory {
    pub field: CategoryField,
    /// The offending value as received (JSON-rendered when not a string).
    pub value: String,
}

/// Failures raised by a loaded artifact while serving a request.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ModelError {
    /// Feature vector length differs from what the artifact was fitted on.
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// A feature value is NaN or infinite after scaling.
    #[error("feature {index} is not finite")]
    NonFiniteFeature { index: usize },

    /// The fertilizer encoder has no label for the predicted class code.
    #[error("class code {0} is not known to the fertilizer encoder")]
    UnknownClassCode(i64),

    /// The artifact's internal structure is inconsistent.
    #[error("corrupt model: {0}")]
    Corrupt(String),
}

/// Errors returned by [`Predictor::predict`](crate::Predictor::predict).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Every range or presence violation found in the payload.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error(transparent)]
    InvalidCategory(#[from] UnknownCategory),

    /// Anything that went wrong after the inputs were accepted.
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}

impl PredictError {
    /// True for the two failure classes caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictError::PredictionFailed(_))
    }

    /// Short outcome tag used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            PredictError::Validation(_) => "validation_error",
            PredictError::InvalidCategory(_) => "invalid_category",
            PredictError::PredictionFailed(_) => "failed",
        }
    }
}

impl From<ModelError> for PredictError {
    fn from(err: ModelError) -> Self {
        PredictError::PredictionFailed(err.to_string())
    }
}

/// Errors raised while loading the artifact directory.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ArtifactError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}
