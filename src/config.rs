//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::risk::RiskThresholds;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the serialized classifier (ONNX)
    pub model_path: PathBuf,

    /// Path to the ordered feature-name list (JSON array)
    pub features_path: PathBuf,

    /// Path to the per-feature default values (JSON object)
    pub defaults_path: PathBuf,

    /// Server port
    pub port: u16,

    /// Risk bucketing cut points
    pub risk: RiskThresholds,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "artifacts/screening_model.onnx".to_string())
                .into(),

            features_path: env::var("FEATURES_PATH")
                .unwrap_or_else(|_| "artifacts/features.json".to_string())
                .into(),

            defaults_path: env::var("FEATURE_DEFAULTS_PATH")
                .unwrap_or_else(|_| "artifacts/feature_defaults.json".to_string())
                .into(),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            risk: RiskThresholds {
                low: env::var("RISK_LOW_CUTOFF")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0.33),
                moderate: env::var("RISK_MODERATE_CUTOFF")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0.66),
            },
        }
    }
}
