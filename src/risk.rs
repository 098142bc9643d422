//! Risk level bucketing
//!
//! Maps the model's positive-class probability onto a coarse
//! low/moderate/high bucket. The cut points are configuration, not
//! derived from the data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Qualitative risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Determine risk level from a probability and the configured cut points
    pub fn from_probability(probability: f64, thresholds: &RiskThresholds) -> Self {
        if probability < thresholds.low {
            RiskLevel::Low
        } else if probability < thresholds.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

/// Configurable risk bucketing cut points
///
/// Invariant: `0 < low < moderate < 1`, checked once at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low: f64,
    pub moderate: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: 0.33,
            moderate: 0.66,
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid risk thresholds: require 0 < low ({low}) < moderate ({moderate}) < 1")]
pub struct InvalidThresholds {
    low: f64,
    moderate: f64,
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<(), InvalidThresholds> {
        if self.low > 0.0 && self.low < self.moderate && self.moderate < 1.0 {
            Ok(())
        } else {
            Err(InvalidThresholds {
                low: self.low,
                moderate: self.moderate,
            })
        }
    }
}
