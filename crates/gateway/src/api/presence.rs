//! Presence diagnostics.
//!
//! `GET /v1/presence/status` — the lock table as the operator sees it:
//! whether the subsystem is disabled, how many locks are live, and each
//! lock's holder/expiry/reason.

use axum::extract::State;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.locks.status())
}
