//! Observability endpoints.
//!
//! - `GET /v1/stats` — aggregate humanization counters (owned snapshot).
//! - `GET /v1/sessions` — tracked sessions.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use zf_sessions::ChatSession;

use crate::state::AppState;

pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.stats.snapshot())
}

#[derive(Serialize)]
struct SessionsResponse {
    count: usize,
    sessions: Vec<ChatSession>,
}

pub async fn sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.list();
    Json(SessionsResponse {
        count: sessions.len(),
        sessions,
    })
}
