//! Process-wide humanization counters.
//!
//! Mutated by every pipeline run, read by observability consumers through
//! [`HumanizationStats::snapshot`] — an owned copy, never the live
//! structure.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Default)]
struct Inner {
    total_processed: u64,
    total_sent: u64,
    avg_response_time_ms: f64,
    samples: u64,
    /// chat_id → number of deliveries currently in flight.
    active: HashMap<String, usize>,
    last_activity_at: Option<DateTime<Utc>>,
}

/// Immutable snapshot handed to API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_processed: u64,
    pub total_sent: u64,
    pub avg_response_time_ms: f64,
    pub active_chats: Vec<String>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct HumanizationStats {
    inner: RwLock<Inner>,
}

impl HumanizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pipeline run began for this chat.
    pub fn delivery_started(&self, chat_id: &str) {
        let mut inner = self.inner.write();
        inner.total_processed += 1;
        *inner.active.entry(chat_id.to_owned()).or_insert(0) += 1;
        inner.last_activity_at = Some(Utc::now());
    }

    /// A pipeline run finished.  `sent` is false for empty-reply
    /// short-circuits and send failures; only sent deliveries feed the
    /// running latency mean.  The chat leaves `active_chats` once no other
    /// delivery is in flight for it.
    pub fn delivery_finished(&self, chat_id: &str, elapsed_ms: u64, sent: bool) {
        let mut inner = self.inner.write();
        if sent {
            inner.total_sent += 1;
            inner.samples += 1;
            let n = inner.samples as f64;
            let delta = (elapsed_ms as f64 - inner.avg_response_time_ms) / n;
            inner.avg_response_time_ms += delta;
        }
        if let Some(count) = inner.active.get_mut(chat_id) {
            *count -= 1;
            if *count == 0 {
                inner.active.remove(chat_id);
            }
        }
        inner.last_activity_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.read();
        let mut active_chats: Vec<String> = inner.active.keys().cloned().collect();
        active_chats.sort();
        StatsSnapshot {
            total_processed: inner.total_processed,
            total_sent: inner.total_sent,
            avg_response_time_ms: inner.avg_response_time_ms,
            active_chats,
            last_activity_at: inner.last_activity_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_mean_over_sent_deliveries() {
        let stats = HumanizationStats::new();
        stats.delivery_started("a");
        stats.delivery_finished("a", 100, true);
        stats.delivery_started("a");
        stats.delivery_finished("a", 200, true);

        let snap = stats.snapshot();
        assert_eq!(snap.total_processed, 2);
        assert_eq!(snap.total_sent, 2);
        assert!((snap.avg_response_time_ms - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unsent_runs_count_processed_but_not_latency() {
        let stats = HumanizationStats::new();
        stats.delivery_started("a");
        stats.delivery_finished("a", 999, false);

        let snap = stats.snapshot();
        assert_eq!(snap.total_processed, 1);
        assert_eq!(snap.total_sent, 0);
        assert_eq!(snap.avg_response_time_ms, 0.0);
    }

    #[test]
    fn chat_stays_active_while_any_delivery_is_in_flight() {
        let stats = HumanizationStats::new();
        stats.delivery_started("a");
        stats.delivery_started("a");
        stats.delivery_finished("a", 10, true);
        assert_eq!(stats.snapshot().active_chats, vec!["a"]);

        stats.delivery_finished("a", 10, true);
        assert!(stats.snapshot().active_chats.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_live_state() {
        let stats = HumanizationStats::new();
        stats.delivery_started("a");
        let snap = stats.snapshot();
        stats.delivery_started("b");

        // The earlier snapshot does not see later mutations.
        assert_eq!(snap.total_processed, 1);
        assert_eq!(snap.active_chats, vec!["a"]);
    }
}
