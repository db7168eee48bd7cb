//! Keyword handoff triggers.
//!
//! A trigger reassigns a conversation to a different processing queue when
//! the message text contains any of its keywords.  Matching is substring
//! based on purpose: a keyword embedded in a longer word still matches
//! ("help" matches "helpful").  That looseness is part of the product
//! contract — do not tighten it to word boundaries.

use serde::{Deserialize, Serialize};

/// One keyword rule owned by a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffTrigger {
    /// Keywords matched case-insensitively as substrings.
    pub keywords: Vec<String>,
    /// Queue the conversation moves to on match.  Must differ from the
    /// owning queue (validated at configuration time).
    pub target_queue_id: String,
    #[serde(default = "d_true")]
    pub enabled: bool,
    /// Lower values evaluate first.
    #[serde(default)]
    pub priority: i32,
}

fn d_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_defaults() {
        let t: HandoffTrigger = serde_json::from_str(
            r#"{"keywords": ["billing"], "target_queue_id": "finance"}"#,
        )
        .unwrap();
        assert!(t.enabled);
        assert_eq!(t.priority, 0);
    }
}
