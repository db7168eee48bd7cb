use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit entry for a queue transfer, assembled by the caller after a trigger
/// match and handed to the external ticket store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub ticket_id: String,
    pub from_queue_id: String,
    pub to_queue_id: String,
    pub reason: String,
    /// What caused the transfer.  Keyword handoffs always record `"keyword"`.
    pub triggered_by: String,
    pub at: DateTime<Utc>,
}

impl TransferRecord {
    /// Build the audit entry for a keyword-triggered transfer.
    pub fn keyword(
        ticket_id: impl Into<String>,
        from_queue_id: impl Into<String>,
        to_queue_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            from_queue_id: from_queue_id.into(),
            to_queue_id: to_queue_id.into(),
            reason: reason.into(),
            triggered_by: "keyword".into(),
            at: Utc::now(),
        }
    }

    /// A transfer whose source and destination coincide is a no-op; the
    /// caller logs it as a warning instead of applying it.
    pub fn is_noop(&self) -> bool {
        self.from_queue_id == self.to_queue_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_transfer_shape() {
        let record = TransferRecord::keyword("t-1", "support", "finance", "matched \"billing\"");
        assert_eq!(record.triggered_by, "keyword");
        assert!(!record.is_noop());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["from_queue_id"], "support");
        assert_eq!(json["to_queue_id"], "finance");
    }

    #[test]
    fn self_transfer_is_noop() {
        let record = TransferRecord::keyword("t-1", "support", "support", "misconfigured");
        assert!(record.is_noop());
    }
}
