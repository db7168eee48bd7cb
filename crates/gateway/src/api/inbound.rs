//! Inbound message contract — the normalized envelope the webhook bridge
//! posts for every incoming chat message.
//!
//! `POST /v1/inbound` records chat activity and evaluates keyword handoff
//! **before** any reply generation: a transfer recommendation short-circuits
//! routing, and the caller requeues the ticket instead of generating.  The
//! engine never mutates ticket state itself — the response carries the
//! [`TransferRecord`] audit entry for the external ticket store to apply.

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use zf_handoff::TransferRecord;
use zf_sessions::ChatSession;

use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct InboundEnvelope {
    /// WhatsApp instance that received the message.
    pub instance_id: String,
    /// Chat (remote JID) the message arrived on.
    pub chat_id: String,
    /// Tenant/client owning the instance.
    pub client_id: String,
    /// Queue the conversation currently sits in.  Absent for chats outside
    /// the ticket system — handoff evaluation is skipped.
    #[serde(default)]
    pub queue_id: Option<String>,
    /// Ticket backing the conversation, for the transfer audit entry.
    #[serde(default)]
    pub ticket_id: Option<String>,
    /// The user's message text.
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct InboundResponse {
    pub session: ChatSession,
    /// Present when a keyword trigger matched.  `transfer.to_queue_id` is
    /// where the caller should move the ticket before generating a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer: Option<TransferRecord>,
    pub actions: Vec<OutboundAction>,
}

#[derive(Debug, Serialize)]
pub struct OutboundAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/inbound
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn inbound(
    State(state): State<AppState>,
    Json(body): Json<InboundEnvelope>,
) -> impl IntoResponse {
    // ── 1. Record activity (starting the session when new) ────────
    let session = state
        .sessions
        .start_session(&body.instance_id, &body.chat_id, &body.client_id);

    // ── 2. Evaluate handoff before generation ─────────────────────
    let transfer = body.queue_id.as_deref().and_then(|queue_id| {
        let target = state.handoff.evaluate(queue_id, &body.text)?;
        let ticket_id = body
            .ticket_id
            .clone()
            .unwrap_or_else(|| format!("{}:{}", body.instance_id, body.chat_id));
        Some(TransferRecord::keyword(
            ticket_id,
            queue_id,
            target,
            format!("keyword match in queue {queue_id}"),
        ))
    });

    // ── 3. Build outbound actions ─────────────────────────────────
    let mut actions = Vec::new();
    if let Some(record) = &transfer {
        if record.is_noop() {
            // A self-loop slipped past config validation upstream; the
            // recommendation is reported but not actionable.
            tracing::warn!(
                queue_id = %record.from_queue_id,
                "handoff recommended a no-op transfer (target equals source)"
            );
        } else {
            actions.push(OutboundAction {
                action_type: "transfer_queue".into(),
                queue_id: Some(record.to_queue_id.clone()),
            });
        }
    }

    Json(InboundResponse {
        session,
        transfer,
        actions,
    })
    .into_response()
}
