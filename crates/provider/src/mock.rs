//! Recording test double for [`MessagingProvider`].
//!
//! Records every call in order and can be scripted to fail specific
//! operations.  Used by tests in the presence, humanizer, and gateway
//! crates.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use zf_domain::error::{Error, Result};

use crate::traits::{MessagingProvider, PresenceState, ProfileAttributes};

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    SendMessage {
        instance_id: String,
        chat_id: String,
        text: String,
    },
    SetPresence {
        instance_id: String,
        chat_id: String,
        state: PresenceState,
    },
    UpdateProfile {
        instance_id: String,
        client_id: String,
    },
    MarkRead {
        instance_id: String,
        chat_id: String,
    },
}

#[derive(Default)]
pub struct MockProvider {
    calls: Mutex<Vec<ProviderCall>>,
    fail_sends: AtomicBool,
    fail_presence: AtomicBool,
    fail_profile: AtomicBool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script send_message to fail until reset.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Script set_presence to fail until reset.
    pub fn fail_presence(&self, fail: bool) {
        self.fail_presence.store(fail, Ordering::SeqCst);
    }

    /// Script update_profile to fail until reset.
    pub fn fail_profile(&self, fail: bool) {
        self.fail_profile.store(fail, Ordering::SeqCst);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ProviderCall::SendMessage { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn presence_states(&self) -> Vec<PresenceState> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ProviderCall::SetPresence { state, .. } => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn profile_call_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, ProviderCall::UpdateProfile { .. }))
            .count()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait::async_trait]
impl MessagingProvider for MockProvider {
    async fn send_message(&self, instance_id: &str, chat_id: &str, text: &str) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Error::provider("mock/sendText", Some(500), "scripted failure"));
        }
        self.record(ProviderCall::SendMessage {
            instance_id: instance_id.to_owned(),
            chat_id: chat_id.to_owned(),
            text: text.to_owned(),
        });
        Ok(())
    }

    async fn set_presence(
        &self,
        instance_id: &str,
        chat_id: &str,
        state: PresenceState,
    ) -> Result<()> {
        if self.fail_presence.load(Ordering::SeqCst) {
            return Err(Error::provider("mock/sendPresence", Some(500), "scripted failure"));
        }
        self.record(ProviderCall::SetPresence {
            instance_id: instance_id.to_owned(),
            chat_id: chat_id.to_owned(),
            state,
        });
        Ok(())
    }

    async fn update_profile(
        &self,
        instance_id: &str,
        client_id: &str,
        _attributes: &ProfileAttributes,
    ) -> Result<()> {
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(Error::provider("mock/updateProfile", Some(500), "scripted failure"));
        }
        self.record(ProviderCall::UpdateProfile {
            instance_id: instance_id.to_owned(),
            client_id: client_id.to_owned(),
        });
        Ok(())
    }

    async fn mark_read(&self, instance_id: &str, chat_id: &str) -> Result<()> {
        self.record(ProviderCall::MarkRead {
            instance_id: instance_id.to_owned(),
            chat_id: chat_id.to_owned(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let mock = MockProvider::new();
        mock.set_presence("i1", "c1", PresenceState::Composing).await.unwrap();
        mock.send_message("i1", "c1", "hello").await.unwrap();
        mock.set_presence("i1", "c1", PresenceState::Available).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], ProviderCall::SetPresence { state: PresenceState::Composing, .. }));
        assert!(matches!(calls[1], ProviderCall::SendMessage { .. }));
        assert_eq!(mock.sent_messages(), vec!["hello"]);
    }

    #[tokio::test]
    async fn scripted_failures() {
        let mock = MockProvider::new();
        mock.fail_sends(true);
        assert!(mock.send_message("i1", "c1", "x").await.is_err());
        assert!(mock.sent_messages().is_empty());

        mock.fail_sends(false);
        assert!(mock.send_message("i1", "c1", "x").await.is_ok());
    }
}
