//! Artifact loading
//!
//! Reads the three persisted artifacts the service cannot run without:
//! the ONNX classifier, the ordered feature-name list, and the
//! per-feature training-data defaults. All three are loaded once at
//! startup and never mutated afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::features::{FeatureDefaults, FeatureSchema};
use crate::model::{Classifier, ModelStatus, OnnxClassifier};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("artifact corrupt: {0}")]
    Corrupt(String),
}

/// The immutable process-wide artifact pair plus derived metadata
pub struct ScreeningArtifact {
    pub classifier: Arc<dyn Classifier>,
    pub schema: FeatureSchema,
    pub defaults: FeatureDefaults,
    pub status: ModelStatus,
}

/// Load the classifier and its schema from the configured paths.
///
/// Fatal on failure: the process refuses to serve without a complete
/// artifact set.
pub fn load(config: &Config) -> Result<ScreeningArtifact, ArtifactError> {
    let schema = load_schema(&config.features_path)?;
    let defaults = load_defaults(&config.defaults_path)?;
    let classifier = OnnxClassifier::from_file(&config.model_path)?;

    let status = ModelStatus {
        model_path: config.model_path.display().to_string(),
        feature_count: schema.len(),
        loaded_at: chrono::Utc::now(),
    };

    info!(
        model = %config.model_path.display(),
        features = schema.len(),
        "Screening artifact loaded"
    );

    Ok(ScreeningArtifact {
        classifier: Arc::new(classifier),
        schema,
        defaults,
        status,
    })
}

/// Load the ordered feature-name list (JSON array of strings)
pub fn load_schema(path: &Path) -> Result<FeatureSchema, ArtifactError> {
    let raw = read_artifact(path)?;
    let names: Vec<String> = serde_json::from_str(&raw)
        .map_err(|e| ArtifactError::Corrupt(format!("{}: {}", path.display(), e)))?;

    let schema = FeatureSchema::new(names);
    if schema.is_empty() {
        return Err(ArtifactError::Corrupt(format!(
            "{}: feature schema is empty",
            path.display()
        )));
    }

    Ok(schema)
}

/// Load the per-feature default values (JSON object, name -> number)
pub fn load_defaults(path: &Path) -> Result<FeatureDefaults, ArtifactError> {
    let raw = read_artifact(path)?;
    let values: HashMap<String, f64> = serde_json::from_str(&raw)
        .map_err(|e| ArtifactError::Corrupt(format!("{}: {}", path.display(), e)))?;

    Ok(FeatureDefaults::new(values))
}

fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path)
        .map_err(|e| ArtifactError::Corrupt(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");

        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn test_corrupt_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{{not json").unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt(_)));
    }

    #[test]
    fn test_empty_schema_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        fs::write(&path, "[]").unwrap();

        let err = load_schema(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt(_)));
    }

    #[test]
    fn test_schema_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        fs::write(&path, r#"["Age", "Clicks", "Hits", "Misses"]"#).unwrap();

        let schema = load_schema(&path).unwrap();
        assert_eq!(schema.names(), ["Age", "Clicks", "Hits", "Misses"]);
    }

    #[test]
    fn test_defaults_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_defaults.json");
        fs::write(&path, r#"{"Age": 9.5, "Clicks": 41}"#).unwrap();

        let defaults = load_defaults(&path).unwrap();
        assert_eq!(defaults.value_for("Age"), 9.5);
        assert_eq!(defaults.value_for("Clicks"), 41.0);
    }

    #[test]
    fn test_missing_defaults_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_defaults.json");

        let err = load_defaults(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }
}
