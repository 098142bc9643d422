//! Model status and schema handlers

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::model::ModelStatus;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    /// Feature names in model input order
    pub features: Vec<String>,
    /// Typical value per feature, used to pre-fill the form
    pub defaults: HashMap<String, f64>,
}

/// Ordered feature names plus their defaults, for the form page and
/// external exporters
pub async fn schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    let features: Vec<String> = state.artifact.schema.names().to_vec();
    let defaults = features
        .iter()
        .map(|name| (name.clone(), state.artifact.defaults.value_for(name)))
        .collect();

    Json(SchemaResponse { features, defaults })
}

/// Loaded-artifact status
pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.artifact.status.clone())
}
