use serde::{Deserialize, Serialize};
use std::fmt;

use zf_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Chat-provider-visible presence for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceState {
    Available,
    Unavailable,
    Composing,
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
            Self::Composing => "composing",
        };
        f.write_str(s)
    }
}

/// Baseline profile attributes pushed once per instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileAttributes {
    /// Default presence advertised by the account.
    pub presence: PresenceState,
    /// Whether read receipts are sent.
    pub read_receipts: bool,
    /// Who may see the account's online status.
    pub online_privacy: String,
}

impl ProfileAttributes {
    /// The baseline every instance gets on first use: visibly online, read
    /// receipts on, online status public.
    pub fn baseline() -> Self {
        Self {
            presence: PresenceState::Available,
            read_receipts: true,
            online_privacy: "all".into(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Trait every messaging/presence adapter must implement.
///
/// Implementations translate between the engine's operations and the wire
/// format of the WhatsApp business provider.  All operations are fallible;
/// which failures abort a flow and which are merely logged is decided by the
/// caller, not here.
#[async_trait::async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Send a text message to a chat.
    async fn send_message(&self, instance_id: &str, chat_id: &str, text: &str) -> Result<()>;

    /// Set the visible presence for a chat.  Callers treat failures as
    /// best-effort (logged, never gating delivery).
    async fn set_presence(
        &self,
        instance_id: &str,
        chat_id: &str,
        state: PresenceState,
    ) -> Result<()>;

    /// Push baseline profile attributes for an instance.  Expensive —
    /// callers memoize it to once per (instance, client).
    async fn update_profile(
        &self,
        instance_id: &str,
        client_id: &str,
        attributes: &ProfileAttributes,
    ) -> Result<()>;

    /// Mark the chat's pending messages as read.  Best-effort.
    async fn mark_read(&self, instance_id: &str, chat_id: &str) -> Result<()>;
}
