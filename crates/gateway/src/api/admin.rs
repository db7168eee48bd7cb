//! Operator escape hatches.
//!
//! - `POST /v1/admin/presence/clear` — wipe the lock table unconditionally.
//! - `POST /v1/admin/presence/enabled` — flip the global presence switch.
//!   Disabling halts every presence side effect without touching in-flight
//!   deliveries: chunked sends continue, presence toggling goes inert.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use crate::state::AppState;

pub async fn clear_locks(State(state): State<AppState>) -> impl IntoResponse {
    let cleared = state.locks.clear_all();
    tracing::info!(cleared, "presence locks cleared by operator");
    Json(serde_json::json!({ "cleared": cleared }))
}

#[derive(Debug, Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

pub async fn set_enabled(
    State(state): State<AppState>,
    Json(body): Json<SetEnabledRequest>,
) -> impl IntoResponse {
    state.locks.set_enabled(body.enabled);
    Json(serde_json::json!({ "enabled": body.enabled }))
}
