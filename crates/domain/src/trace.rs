use serde::Serialize;

/// Structured trace events emitted across all Zapflow crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LockAcquired {
        chat_key: String,
        holder: String,
        refreshed: bool,
    },
    LockContended {
        chat_key: String,
        holder: String,
        held_by: String,
    },
    LockReleased {
        chat_key: String,
        holder: String,
    },
    LocksCleared {
        count: usize,
    },
    ProfileConfigured {
        instance_id: String,
        client_id: String,
        source: String,
    },
    DeliveryCompleted {
        chat_key: String,
        chunks: usize,
        elapsed_ms: u64,
    },
    DeliveryCancelled {
        chat_key: String,
        chunks_sent: usize,
    },
    HandoffMatched {
        queue_id: String,
        target_queue_id: String,
        keyword: String,
        priority: i32,
    },
    SessionStarted {
        chat_key: String,
        client_id: String,
    },
    SessionExpired {
        chat_key: String,
        idle_secs: i64,
    },
    SessionStopped {
        chat_key: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "zf_event");
    }
}
