//! Handoff rule evaluation endpoint.
//!
//! `POST /v1/handoff/evaluate` — pure evaluation, used by the dashboard's
//! rule tester and by callers that route outside the inbound flow.  No
//! ticket state is touched.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub queue_id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    /// `null` when no trigger matched — the conversation stays put.
    pub target_queue_id: Option<String>,
}

pub async fn evaluate(
    State(state): State<AppState>,
    Json(body): Json<EvaluateRequest>,
) -> impl IntoResponse {
    let target_queue_id = state.handoff.evaluate(&body.queue_id, &body.text);
    Json(EvaluateResponse { target_queue_id })
}
