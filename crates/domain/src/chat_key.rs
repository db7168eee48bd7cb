//! Identity types for the resources the engine serializes on.
//!
//! A [`ChatKey`] names one conversation on one WhatsApp instance; it is the
//! unit of mutual exclusion for presence writes.  A [`ProfileKey`] names one
//! (instance, client) pair for the once-per-instance profile configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identity of a single conversation: `instance_id` + `chat_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatKey {
    pub instance_id: String,
    pub chat_id: String,
}

impl ChatKey {
    pub fn new(instance_id: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            chat_id: chat_id.into(),
        }
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.instance_id, self.chat_id)
    }
}

/// The logical actor currently entitled to mutate presence for a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holder {
    Ai,
    User,
    System,
    AutoTrigger,
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ai => "ai",
            Self::User => "user",
            Self::System => "system",
            Self::AutoTrigger => "auto_trigger",
        };
        f.write_str(s)
    }
}

/// Identity of the once-per-instance profile configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileKey {
    pub instance_id: String,
    pub client_id: String,
}

impl ProfileKey {
    pub fn new(instance_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            client_id: client_id.into(),
        }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.instance_id, self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_key_display() {
        let key = ChatKey::new("inst-1", "5511999@s.whatsapp.net");
        assert_eq!(key.to_string(), "inst-1:5511999@s.whatsapp.net");
    }

    #[test]
    fn holder_serde_snake_case() {
        let json = serde_json::to_string(&Holder::AutoTrigger).unwrap();
        assert_eq!(json, "\"auto_trigger\"");
    }

    #[test]
    fn chat_key_equality_is_composite() {
        let a = ChatKey::new("i1", "c1");
        let b = ChatKey::new("i1", "c2");
        let c = ChatKey::new("i2", "c1");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ChatKey::new("i1", "c1"));
    }
}
