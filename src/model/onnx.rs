//! ONNX-backed classifier
//!
//! Wraps an ONNX Runtime session behind the [`Classifier`] trait.
//! Handles both output layouts common ONNX exporters produce for tree
//! ensembles: plain probability tensors (XGBoost, random forest) and the
//! ZipMap `seq(map(int64, float))` form (sklearn pipelines).

use std::path::Path;
use std::sync::RwLock;

use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use tracing::{debug, info};

use super::loader::ArtifactError;
use super::{Classifier, InferenceError};

#[derive(Debug)]
pub struct OnnxClassifier {
    /// Session::run takes &mut self; the lock gives interior mutability
    /// behind the read-only trait surface.
    session: RwLock<Session>,
    input_name: String,
}

impl OnnxClassifier {
    /// Load the serialized classifier from a file
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }

        info!(model = %path.display(), "Loading ONNX model");

        ort::init().commit();

        let session = Session::builder()
            .map_err(|e| ArtifactError::Corrupt(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::Corrupt(format!("session options: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ArtifactError::Corrupt(format!("{}: {}", path.display(), e)))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "float_input".to_string());

        info!(input = %input_name, "ONNX model loaded");

        Ok(Self {
            session: RwLock::new(session),
            input_name,
        })
    }

    /// One forward pass: returns (class label, positive-class probability)
    fn run(&self, features: &[f32]) -> Result<(i64, f64), InferenceError> {
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .map_err(|e| InferenceError(format!("input tensor: {}", e)))?;

        let mut session = self
            .session
            .write()
            .map_err(|_| InferenceError("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| InferenceError(format!("session run: {}", e)))?;

        let probability = extract_probability(&outputs)?;
        let class = extract_label(&outputs).unwrap_or(i64::from(probability >= 0.5));

        Ok((class, probability))
    }
}

impl Classifier for OnnxClassifier {
    fn predict_class(&self, features: &[f32]) -> Result<i64, InferenceError> {
        Ok(self.run(features)?.0)
    }

    fn predict_probability(&self, features: &[f32]) -> Result<f64, InferenceError> {
        Ok(self.run(features)?.1)
    }
}

/// Extract the positive-class probability from the session outputs
fn extract_probability(outputs: &SessionOutputs) -> Result<f64, InferenceError> {
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let prob = positive_class_from_tensor(&shape.iter().copied().collect::<Vec<_>>(), data);
            debug!(output = %name, prob = prob, "Extracted probability from tensor");
            return Ok(prob);
        }

        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            if let Ok(prob) = extract_from_sequence_map(&output) {
                debug!(output = %name, prob = prob, "Extracted probability from seq(map)");
                return Ok(prob);
            }
        }
    }

    Err(InferenceError(
        "no probability output found in model outputs".to_string(),
    ))
}

/// Extract the class label output, when the exporter emitted one
fn extract_label(outputs: &SessionOutputs) -> Option<i64> {
    for (name, output) in outputs.iter() {
        if !name.contains("label") {
            continue;
        }
        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            return data.first().copied();
        }
    }
    None
}

/// Pick P(class=1) out of a probability tensor of shape [1, n] or [n]
fn positive_class_from_tensor(dims: &[i64], data: &[f32]) -> f64 {
    let classes = match dims {
        [_, n] => *n as usize,
        [n] => *n as usize,
        _ => data.len(),
    };

    if classes >= 2 && data.len() >= 2 {
        data[1] as f64
    } else {
        data.first().map(|&v| v as f64).unwrap_or(0.5)
    }
}

/// ZipMap output: a sequence of one map from class id to probability
fn extract_from_sequence_map(output: &ort::value::DynValue) -> Result<f64, InferenceError> {
    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| InferenceError(format!("sequence downcast: {}", e)))?;

    let maps = sequence
        .try_extract_sequence::<DynMapValueType>()
        .map_err(|e| InferenceError(format!("sequence extract: {}", e)))?;

    let map_value = maps
        .first()
        .ok_or_else(|| InferenceError("empty probability sequence".to_string()))?;

    let kv_pairs = map_value
        .try_extract_key_values::<i64, f32>()
        .map_err(|e| InferenceError(format!("map extract: {}", e)))?;

    for (class_id, prob) in &kv_pairs {
        if *class_id == 1 {
            return Ok(*prob as f64);
        }
    }
    for (class_id, prob) in &kv_pairs {
        if *class_id == 0 {
            return Ok(1.0 - *prob as f64);
        }
    }

    Err(InferenceError(
        "no class probability found in map output".to_string(),
    ))
}
