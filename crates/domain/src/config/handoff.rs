use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::trigger::HandoffTrigger;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handoff routing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Keyword handoff rules, grouped by owning queue.
///
/// ```toml
/// [[handoff.queues.support]]
/// keywords = ["billing", "invoice"]
/// target_queue_id = "finance"
/// priority = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HandoffConfig {
    #[serde(default)]
    pub queues: HashMap<String, Vec<HandoffTrigger>>,
}
