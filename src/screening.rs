//! The screening pipeline
//!
//! One submission in, one outcome out: validate and re-order the raw
//! inputs against the schema, run the classifier, bucket the probability.
//! Stateless apart from the read-only artifact it is handed.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppResult;
use crate::model::ScreeningArtifact;
use crate::risk::{RiskLevel, RiskThresholds};

/// Warning copy shown when the classifier indicates risk
const RISK_MESSAGE: &str = "Possible dyslexia risk detected.";
/// Reassuring copy for the negative class
const NO_RISK_MESSAGE: &str = "Low dyslexia risk.";

/// The computed result, exposed as a plain record so external exporters
/// can serialize it as-is.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    /// 1 = risk indicated, 0 = not indicated
    pub predicted_class: i64,
    /// Probability of class 1, rounded to three decimals
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub message: &'static str,
}

/// Run one screening request against the loaded artifact.
///
/// `raw_inputs` maps feature names to numbers or numeric strings, in any
/// key order; missing schema names take their configured defaults.
pub fn screen(
    artifact: &ScreeningArtifact,
    thresholds: &RiskThresholds,
    raw_inputs: &Map<String, Value>,
) -> AppResult<ScreeningOutcome> {
    let vector = crate::features::assemble(&artifact.schema, &artifact.defaults, raw_inputs)?;

    let predicted_class = artifact.classifier.predict_class(&vector)?;
    let probability = artifact.classifier.predict_probability(&vector)?;

    let risk_level = RiskLevel::from_probability(probability, thresholds);

    debug!(
        class = predicted_class,
        probability = probability,
        risk = ?risk_level,
        "Screening complete"
    );

    Ok(ScreeningOutcome {
        predicted_class,
        probability: (probability * 1000.0).round() / 1000.0,
        risk_level,
        message: if predicted_class == 1 {
            RISK_MESSAGE
        } else {
            NO_RISK_MESSAGE
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::error::AppError;
    use crate::features::{FeatureDefaults, FeatureSchema};
    use crate::model::{Classifier, InferenceError, ModelStatus};
    use serde_json::json;

    /// Stub classifier: probability is the mean of the features clamped
    /// to [0, 1], class is probability >= 0.5. Deterministic and
    /// sensitive to every input position.
    struct StubClassifier;

    impl StubClassifier {
        fn probability_of(features: &[f32]) -> f64 {
            let mean = features.iter().sum::<f32>() as f64 / features.len() as f64;
            (mean / 100.0).clamp(0.0, 1.0)
        }
    }

    impl Classifier for StubClassifier {
        fn predict_class(&self, features: &[f32]) -> Result<i64, InferenceError> {
            Ok(i64::from(Self::probability_of(features) >= 0.5))
        }

        fn predict_probability(&self, features: &[f32]) -> Result<f64, InferenceError> {
            Ok(Self::probability_of(features))
        }
    }

    fn test_artifact() -> ScreeningArtifact {
        let mut defaults = HashMap::new();
        defaults.insert("age".to_string(), 10.0);
        defaults.insert("clicks".to_string(), 50.0);
        defaults.insert("hits".to_string(), 40.0);

        ScreeningArtifact {
            classifier: Arc::new(StubClassifier),
            schema: FeatureSchema::new(vec![
                "age".to_string(),
                "clicks".to_string(),
                "hits".to_string(),
            ]),
            defaults: FeatureDefaults::new(defaults),
            status: ModelStatus {
                model_path: "stub".to_string(),
                feature_count: 3,
                loaded_at: chrono::Utc::now(),
            },
        }
    }

    fn as_map(value: serde_json::Value) -> Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_outcome_is_well_formed() {
        let artifact = test_artifact();
        let outcome = screen(
            &artifact,
            &RiskThresholds::default(),
            &as_map(json!({"age": 12, "clicks": 50, "hits": 40})),
        )
        .unwrap();

        assert!(outcome.predicted_class == 0 || outcome.predicted_class == 1);
        assert!((0.0..=1.0).contains(&outcome.probability));
    }

    #[test]
    fn test_defaulting_matches_explicit_request() {
        let artifact = test_artifact();
        let thresholds = RiskThresholds::default();

        let partial = screen(&artifact, &thresholds, &as_map(json!({"age": 12}))).unwrap();
        let explicit = screen(
            &artifact,
            &thresholds,
            &as_map(json!({"age": 12, "clicks": 50, "hits": 40})),
        )
        .unwrap();

        assert_eq!(partial.predicted_class, explicit.predicted_class);
        assert_eq!(partial.probability, explicit.probability);
        assert_eq!(partial.risk_level, explicit.risk_level);
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let artifact = test_artifact();
        let thresholds = RiskThresholds::default();

        let a = screen(
            &artifact,
            &thresholds,
            &as_map(json!({"age": 12, "clicks": 30, "hits": 20})),
        )
        .unwrap();
        let b = screen(
            &artifact,
            &thresholds,
            &as_map(json!({"hits": 20, "clicks": 30, "age": 12})),
        )
        .unwrap();

        assert_eq!(a.probability, b.probability);
        assert_eq!(a.risk_level, b.risk_level);
    }

    #[test]
    fn test_non_numeric_input_produces_no_prediction() {
        let artifact = test_artifact();
        let result = screen(
            &artifact,
            &RiskThresholds::default(),
            &as_map(json!({"clicks": "abc"})),
        );

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_message_matches_class() {
        let artifact = test_artifact();
        let thresholds = RiskThresholds::default();

        // Mean 10 -> probability 0.1 -> class 0
        let low = screen(
            &artifact,
            &thresholds,
            &as_map(json!({"age": 10, "clicks": 10, "hits": 10})),
        )
        .unwrap();
        assert_eq!(low.predicted_class, 0);
        assert_eq!(low.message, NO_RISK_MESSAGE);
        assert_eq!(low.risk_level, RiskLevel::Low);

        // Mean 90 -> probability 0.9 -> class 1
        let high = screen(
            &artifact,
            &thresholds,
            &as_map(json!({"age": 90, "clicks": 90, "hits": 90})),
        )
        .unwrap();
        assert_eq!(high.predicted_class, 1);
        assert_eq!(high.message, RISK_MESSAGE);
        assert_eq!(high.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_probability_is_rounded_to_three_decimals() {
        let artifact = test_artifact();
        let outcome = screen(
            &artifact,
            &RiskThresholds::default(),
            &as_map(json!({"age": 12.345, "clicks": 0, "hits": 0})),
        )
        .unwrap();

        let scaled = outcome.probability * 1000.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
