//! Trigger evaluation.
//!
//! Rules are kept sorted by ascending priority per queue; evaluation walks
//! them in order and returns the first enabled trigger whose keywords match.
//! Matching is case-folded substring containment — a keyword inside a longer
//! word matches, and that looseness is contractual (see
//! [`zf_domain::trigger`]).

use std::collections::HashMap;

use parking_lot::RwLock;

use zf_domain::trace::TraceEvent;
use zf_domain::trigger::HandoffTrigger;

/// Priority-ordered keyword router over the configured queues.
///
/// Stateless with respect to tickets: `evaluate` only recommends a
/// destination.  Trigger sets can be replaced at runtime when the dashboard
/// saves new rules.
pub struct HandoffEngine {
    queues: RwLock<HashMap<String, Vec<HandoffTrigger>>>,
}

impl HandoffEngine {
    pub fn new(mut queues: HashMap<String, Vec<HandoffTrigger>>) -> Self {
        for triggers in queues.values_mut() {
            triggers.sort_by_key(|t| t.priority);
        }
        Self {
            queues: RwLock::new(queues),
        }
    }

    /// Evaluate the queue's triggers against `text`.
    ///
    /// Returns the target queue of the first (lowest-priority-value) enabled
    /// trigger with a matching keyword, or `None` when nothing matches —
    /// the conversation stays where it is.
    pub fn evaluate(&self, queue_id: &str, text: &str) -> Option<String> {
        let queues = self.queues.read();
        let triggers = queues.get(queue_id)?;
        let folded = text.to_lowercase();

        for trigger in triggers.iter().filter(|t| t.enabled) {
            let matched = trigger
                .keywords
                .iter()
                .find(|keyword| !keyword.is_empty() && folded.contains(&keyword.to_lowercase()));

            if let Some(keyword) = matched {
                TraceEvent::HandoffMatched {
                    queue_id: queue_id.to_owned(),
                    target_queue_id: trigger.target_queue_id.clone(),
                    keyword: keyword.clone(),
                    priority: trigger.priority,
                }
                .emit();
                return Some(trigger.target_queue_id.clone());
            }
        }
        None
    }

    /// Replace one queue's trigger list (dashboard save).  The list is
    /// re-sorted; validation happened at the configuration boundary.
    pub fn replace_queue(&self, queue_id: &str, mut triggers: Vec<HandoffTrigger>) {
        triggers.sort_by_key(|t| t.priority);
        tracing::debug!(queue_id, count = triggers.len(), "handoff triggers replaced");
        self.queues.write().insert(queue_id.to_owned(), triggers);
    }

    pub fn queue_ids(&self) -> Vec<String> {
        self.queues.read().keys().cloned().collect()
    }

    pub fn trigger_count(&self, queue_id: &str) -> usize {
        self.queues
            .read()
            .get(queue_id)
            .map(|t| t.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(keywords: &[&str], target: &str, priority: i32) -> HandoffTrigger {
        HandoffTrigger {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            target_queue_id: target.to_owned(),
            enabled: true,
            priority,
        }
    }

    fn engine_with(triggers: Vec<HandoffTrigger>) -> HandoffEngine {
        let mut queues = HashMap::new();
        queues.insert("support".to_string(), triggers);
        HandoffEngine::new(queues)
    }

    #[test]
    fn lowest_priority_value_wins() {
        let engine = engine_with(vec![
            trigger(&["help"], "human", 2),
            trigger(&["billing"], "finance", 1),
        ]);
        // Both keywords occur; the priority-1 trigger decides.
        assert_eq!(
            engine.evaluate("support", "I need help with billing"),
            Some("finance".into())
        );
    }

    #[test]
    fn no_match_returns_none() {
        let engine = engine_with(vec![trigger(&["billing"], "finance", 1)]);
        assert_eq!(engine.evaluate("support", "just saying hi"), None);
    }

    #[test]
    fn unknown_queue_returns_none() {
        let engine = engine_with(vec![trigger(&["billing"], "finance", 1)]);
        assert_eq!(engine.evaluate("sales", "billing question"), None);
    }

    #[test]
    fn disabled_triggers_are_skipped() {
        let mut t = trigger(&["billing"], "finance", 1);
        t.enabled = false;
        let engine = engine_with(vec![t, trigger(&["billing"], "human", 2)]);
        assert_eq!(
            engine.evaluate("support", "billing issue"),
            Some("human".into())
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let engine = engine_with(vec![trigger(&["Billing"], "finance", 1)]);
        assert_eq!(
            engine.evaluate("support", "BILLING problem"),
            Some("finance".into())
        );
    }

    #[test]
    fn substring_match_inside_longer_word() {
        // Documented, intentional: "help" embedded in "helpful" matches.
        let engine = engine_with(vec![trigger(&["help"], "human", 1)]);
        assert_eq!(
            engine.evaluate("support", "you were very helpful"),
            Some("human".into())
        );
    }

    #[test]
    fn empty_trigger_list_passes_through() {
        let engine = engine_with(vec![]);
        assert_eq!(engine.evaluate("support", "anything"), None);
    }

    #[test]
    fn replace_queue_takes_effect() {
        let engine = engine_with(vec![trigger(&["old"], "a", 1)]);
        engine.replace_queue("support", vec![trigger(&["new"], "b", 1)]);

        assert_eq!(engine.evaluate("support", "old keyword"), None);
        assert_eq!(engine.evaluate("support", "new keyword"), Some("b".into()));
        assert_eq!(engine.trigger_count("support"), 1);
    }
}
