//! Humanized delivery endpoint.
//!
//! `POST /v1/deliver` runs one generated reply through the pacing pipeline
//! to completion (blocking, like the inbound turn): random delay, typing
//! indicator under the presence lock, chunked sends.  The once-per-instance
//! profile configuration is asserted lazily here, before the first presence
//! toggle for the chat.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use zf_domain::chat_key::ChatKey;
use zf_domain::error::Error;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeliverRequest {
    pub instance_id: String,
    pub chat_id: String,
    pub client_id: String,
    /// The generated reply to humanize and send.
    pub reply_text: String,
    /// Profile from the catalog; absent means the built-in default.
    #[serde(default)]
    pub profile_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeliverResponse {
    pub sent_chunks: usize,
    pub total_chunks: usize,
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

pub async fn deliver(
    State(state): State<AppState>,
    Json(body): Json<DeliverRequest>,
) -> Response {
    let profile = match state.profiles.resolve(body.profile_id.as_deref()) {
        Ok(p) => p,
        Err(Error::UnknownProfile(id)) => {
            return api_error(StatusCode::BAD_REQUEST, format!("unknown profile: {id}"));
        }
        Err(e) => {
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    // The delivery belongs to a live session; starting is idempotent and
    // doubles as the activity mark.
    state
        .sessions
        .start_session(&body.instance_id, &body.chat_id, &body.client_id);

    // Lazy once-per-instance profile configuration before the first
    // presence toggle.  Best-effort: a skip or failure here never blocks
    // the reply.
    if let Err(e) = state
        .configurator
        .configure_once(&body.instance_id, &body.client_id, "deliver")
        .await
    {
        tracing::warn!(
            instance_id = %body.instance_id,
            error = %e,
            "profile configuration failed; delivering anyway"
        );
    }

    let key = ChatKey::new(&body.instance_id, &body.chat_id);
    match state.delivery.deliver(&key, &body.reply_text, &profile).await {
        Ok(outcome) => Json(DeliverResponse {
            sent_chunks: outcome.sent_chunks,
            total_chunks: outcome.total_chunks,
            cancelled: outcome.cancelled,
            elapsed_ms: outcome.elapsed_ms,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(chat_key = %key, error = %e, "humanized delivery failed");
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}
