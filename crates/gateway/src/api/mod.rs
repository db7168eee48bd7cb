pub mod admin;
pub mod auth;
pub mod deliver;
pub mod handoff;
pub mod inbound;
pub mod presence;
pub mod stats;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// Routes are split into **public** (health probe), **protected** (gated
/// behind the API bearer token), and **admin** (separate admin token).
///
/// `state` is needed to wire up the auth middleware at build time.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/healthz", get(health));

    let protected = Router::new()
        // Orchestration entry points
        .route("/v1/inbound", post(inbound::inbound))
        .route("/v1/deliver", post(deliver::deliver))
        // Handoff rule tester (dashboard)
        .route("/v1/handoff/evaluate", post(handoff::evaluate))
        // Diagnostics
        .route("/v1/presence/status", get(presence::status))
        .route("/v1/stats", get(stats::stats))
        .route("/v1/sessions", get(stats::sessions))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_token,
        ));

    let admin = Router::new()
        .route("/v1/admin/presence/clear", post(admin::clear_locks))
        .route("/v1/admin/presence/enabled", post(admin::set_enabled))
        .layer(middleware::from_fn_with_state(
            state,
            auth::require_admin_token,
        ));

    public.merge(protected).merge(admin)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
