//! Model artifact handling
//!
//! The classifier sits behind a small capability trait so the request
//! pipeline never sees the ONNX object shape and can be tested with a
//! stub model.

mod loader;
mod onnx;

pub use loader::{load, ArtifactError, ScreeningArtifact};
pub use onnx::OnnxClassifier;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("inference failed: {0}")]
pub struct InferenceError(pub String);

/// Capability interface for the fitted classifier
pub trait Classifier: Send + Sync {
    /// Predicted class label: 0 (no risk indicated) or 1 (risk indicated)
    fn predict_class(&self, features: &[f32]) -> Result<i64, InferenceError>;

    /// Probability of the positive class, in [0, 1]
    fn predict_probability(&self, features: &[f32]) -> Result<f64, InferenceError>;
}

/// Status of the loaded artifact, for the UI footer and operators
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub model_path: String,
    pub feature_count: usize,
    pub loaded_at: DateTime<Utc>,
}
