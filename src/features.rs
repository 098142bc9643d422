//! Feature schema and vector assembly
//!
//! The schema is the ordered feature-name list persisted at training time.
//! Every request is re-ordered to match it before touching the classifier;
//! a vector assembled in any other order silently corrupts predictions.

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// Fallback default when the defaults artifact has no entry for a feature.
/// Age gets a plausible student age instead of zero.
const AGE_FALLBACK: f64 = 10.0;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("feature '{name}' is not numeric: {value}")]
    NotNumeric { name: String, value: String },

    #[error("feature '{0}' must be a finite number")]
    NotFinite(String),
}

/// Ordered feature names, fixed at training time. Immutable after load.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Typical per-feature values from the training data, used to fill
/// request fields the user left out.
#[derive(Debug, Clone, Default)]
pub struct FeatureDefaults {
    values: HashMap<String, f64>,
}

impl FeatureDefaults {
    pub fn new(values: HashMap<String, f64>) -> Self {
        Self { values }
    }

    pub fn value_for(&self, name: &str) -> f64 {
        if let Some(v) = self.values.get(name) {
            return *v;
        }
        if name.eq_ignore_ascii_case("age") {
            AGE_FALLBACK
        } else {
            0.0
        }
    }
}

/// Assemble the model input vector in schema order.
///
/// Each raw value must coerce to a finite number (JSON numbers and numeric
/// strings are accepted). Schema names absent from the request take their
/// configured default; names outside the schema are rejected.
pub fn assemble(
    schema: &FeatureSchema,
    defaults: &FeatureDefaults,
    raw: &Map<String, Value>,
) -> Result<Vec<f32>, InputError> {
    for name in raw.keys() {
        if !schema.contains(name) {
            return Err(InputError::UnknownFeature(name.clone()));
        }
    }

    let mut vector = Vec::with_capacity(schema.len());
    for name in schema.names() {
        let value = match raw.get(name) {
            Some(value) => coerce(name, value)?,
            None => defaults.value_for(name),
        };
        vector.push(value as f32);
    }

    Ok(vector)
}

/// Coerce one raw JSON value to a finite f64
fn coerce(name: &str, value: &Value) -> Result<f64, InputError> {
    let number = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| InputError::NotNumeric {
            name: name.to_string(),
            value: n.to_string(),
        })?,
        Value::String(s) => {
            s.trim()
                .parse::<f64>()
                .map_err(|_| InputError::NotNumeric {
                    name: name.to_string(),
                    value: s.clone(),
                })?
        }
        other => {
            return Err(InputError::NotNumeric {
                name: name.to_string(),
                value: other.to_string(),
            })
        }
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(InputError::NotFinite(name.to_string()))
    }
}
