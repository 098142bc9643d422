//! Screening request handler

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::screening::{self, ScreeningOutcome};
use crate::{AppResult, AppState};

/// Run one screening submission.
///
/// The body is a JSON object mapping feature names to numbers or numeric
/// strings. Invalid values come back as 400 with a message the form
/// re-renders inline; the process is unaffected.
pub async fn submit(
    State(state): State<AppState>,
    Json(raw_inputs): Json<Map<String, Value>>,
) -> AppResult<Json<ScreeningOutcome>> {
    let outcome = screening::screen(&state.artifact, &state.risk, &raw_inputs)?;
    Ok(Json(outcome))
}
