//! The humanized delivery pipeline.
//!
//! One logical reply moves through `PENDING → DELAYING → TYPING →
//! (CHUNK_SEND)* → DONE`.  Presence is best-effort throughout: a contested
//! lock skips the typing indicator, and presence-call failures are logged
//! and ignored — delivery itself is never gated on presence.  Send failures
//! do propagate; retry policy belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use zf_domain::chat_key::{ChatKey, Holder};
use zf_domain::error::Result;
use zf_domain::profile::HumanizationProfile;
use zf_domain::trace::TraceEvent;
use zf_presence::PresenceLockMap;
use zf_provider::{MessagingProvider, PresenceState};
use zf_sessions::SessionRegistry;

use crate::chunk::split_chunks;
use crate::stats::HumanizationStats;
use crate::timing;

/// What one delivery did.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub sent_chunks: usize,
    pub total_chunks: usize,
    /// True when the owning session was torn down mid-delivery and the
    /// remaining chunks were dropped.
    pub cancelled: bool,
    pub elapsed_ms: u64,
}

/// Shared delivery service: one instance serves every chat concurrently;
/// each `deliver` call is an independent task.
pub struct HumanizedDelivery {
    provider: Arc<dyn MessagingProvider>,
    locks: Arc<PresenceLockMap>,
    sessions: Arc<SessionRegistry>,
    stats: Arc<HumanizationStats>,
}

impl HumanizedDelivery {
    pub fn new(
        provider: Arc<dyn MessagingProvider>,
        locks: Arc<PresenceLockMap>,
        sessions: Arc<SessionRegistry>,
        stats: Arc<HumanizationStats>,
    ) -> Self {
        Self {
            provider,
            locks,
            sessions,
            stats,
        }
    }

    /// Run one reply through the pipeline to completion.
    ///
    /// Suspension points are exactly the delay, typing, and inter-chunk
    /// waits — other chats keep processing while this one sleeps.
    pub async fn deliver(
        &self,
        key: &ChatKey,
        reply: &str,
        profile: &HumanizationProfile,
    ) -> Result<DeliveryOutcome> {
        self.stats.delivery_started(&key.chat_id);

        let text = reply.trim();
        if text.is_empty() {
            // Nothing to say: no delay, no typing, no send.
            self.stats.delivery_finished(&key.chat_id, 0, false);
            return Ok(DeliveryOutcome {
                sent_chunks: 0,
                total_chunks: 0,
                cancelled: false,
                elapsed_ms: 0,
            });
        }

        let started = tokio::time::Instant::now();
        // Cancellation only applies to chats the registry is tracking; a
        // caller delivering outside a session is not cut short.
        let tracked = self.sessions.is_active(key);

        // ── DELAYING ─────────────────────────────────────────────────
        tokio::time::sleep(timing::sample_delay(&profile.response_delay)).await;

        // ── TYPING ───────────────────────────────────────────────────
        let typing = &profile.behavior.typing;
        if typing.enabled {
            if self.locks.acquire(key, Holder::Ai, "typing indicator") {
                if let Err(e) = self
                    .provider
                    .set_presence(&key.instance_id, &key.chat_id, PresenceState::Composing)
                    .await
                {
                    tracing::warn!(chat_key = %key, error = %e, "composing presence failed");
                }

                let duration = timing::typing_duration(
                    text.chars().count(),
                    profile.typing_speed_wpm,
                    typing,
                );
                tokio::time::sleep(duration).await;

                if let Err(e) = self
                    .provider
                    .set_presence(&key.instance_id, &key.chat_id, PresenceState::Available)
                    .await
                {
                    tracing::warn!(chat_key = %key, error = %e, "available presence failed");
                }
                self.locks.release(key, Holder::Ai);
            } else {
                // Contested presence is a skip, not a failure: the reply
                // still goes out, just without the indicator.
                tracing::debug!(chat_key = %key, "typing indicator skipped — presence contested");
            }
        }

        // ── CHUNK_SEND ───────────────────────────────────────────────
        let handling = &profile.behavior.message_handling;
        let chunks = if handling.split_long_messages
            && text.chars().count() > handling.max_chars_per_chunk
        {
            split_chunks(text, handling.max_chars_per_chunk)
        } else {
            vec![text.to_owned()]
        };

        if handling.mark_as_read {
            if let Err(e) = self.provider.mark_read(&key.instance_id, &key.chat_id).await {
                tracing::warn!(chat_key = %key, error = %e, "mark-as-read failed");
            }
        }

        let mut sent_chunks = 0usize;
        let mut cancelled = false;
        for (idx, chunk) in chunks.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(Duration::from_millis(handling.delay_between_chunks_ms)).await;

                if tracked && !self.sessions.is_active(key) {
                    // Session torn down mid-delivery: the chunks already on
                    // the wire stay sent, the rest are dropped.
                    cancelled = true;
                    break;
                }
            }

            if let Err(e) = self
                .provider
                .send_message(&key.instance_id, &key.chat_id, chunk)
                .await
            {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                self.stats.delivery_finished(&key.chat_id, elapsed_ms, false);
                return Err(e);
            }
            sent_chunks += 1;
        }

        // ── DONE ─────────────────────────────────────────────────────
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if cancelled {
            TraceEvent::DeliveryCancelled {
                chat_key: key.to_string(),
                chunks_sent: sent_chunks,
            }
            .emit();
        } else {
            TraceEvent::DeliveryCompleted {
                chat_key: key.to_string(),
                chunks: sent_chunks,
                elapsed_ms,
            }
            .emit();
        }
        self.stats.delivery_finished(&key.chat_id, elapsed_ms, true);

        Ok(DeliveryOutcome {
            sent_chunks,
            total_chunks: chunks.len(),
            cancelled,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zf_domain::config::{PresenceConfig, SessionsConfig};
    use zf_domain::profile::{MessageHandling, ResponseDelay, TypingBehavior};
    use zf_presence::ProfileConfigurator;
    use zf_provider::{MockProvider, ProviderCall};

    struct Harness {
        delivery: HumanizedDelivery,
        provider: Arc<MockProvider>,
        locks: Arc<PresenceLockMap>,
        sessions: Arc<SessionRegistry>,
        stats: Arc<HumanizationStats>,
    }

    fn harness() -> Harness {
        let provider = Arc::new(MockProvider::new());
        let locks = Arc::new(PresenceLockMap::new(&PresenceConfig::default()));
        let configurator = Arc::new(ProfileConfigurator::new(
            locks.clone(),
            provider.clone() as Arc<dyn MessagingProvider>,
        ));
        let sessions = Arc::new(SessionRegistry::new(
            SessionsConfig::default(),
            configurator,
        ));
        let stats = Arc::new(HumanizationStats::new());
        let delivery = HumanizedDelivery::new(
            provider.clone() as Arc<dyn MessagingProvider>,
            locks.clone(),
            sessions.clone(),
            stats.clone(),
        );
        Harness {
            delivery,
            provider,
            locks,
            sessions,
            stats,
        }
    }

    /// Profile with exact (non-random) timings for assertions.
    fn profile(delay_ms: u64, typing_ms: u64, max_chars: usize, chunk_delay_ms: u64) -> HumanizationProfile {
        let mut p = HumanizationProfile::default();
        p.response_delay = ResponseDelay { min_ms: delay_ms, max_ms: delay_ms };
        p.behavior.typing = TypingBehavior {
            enabled: typing_ms > 0,
            min_duration_ms: typing_ms,
            max_duration_ms: typing_ms,
        };
        p.behavior.message_handling = MessageHandling {
            split_long_messages: true,
            max_chars_per_chunk: max_chars,
            delay_between_chunks_ms: chunk_delay_ms,
            mark_as_read: false,
        };
        p
    }

    fn key() -> ChatKey {
        ChatKey::new("i1", "5511999")
    }

    #[tokio::test]
    async fn empty_reply_bypasses_everything() {
        let h = harness();
        let outcome = h
            .delivery
            .deliver(&key(), "   \n ", &profile(50, 50, 280, 0))
            .await
            .unwrap();

        assert_eq!(outcome.sent_chunks, 0);
        assert!(!outcome.cancelled);
        assert!(h.provider.calls().is_empty());

        let snap = h.stats.snapshot();
        assert_eq!(snap.total_processed, 1);
        assert_eq!(snap.total_sent, 0);
    }

    #[tokio::test]
    async fn delay_typing_then_send_with_one_lock_cycle() {
        let h = harness();
        let started = tokio::time::Instant::now();
        let outcome = h
            .delivery
            .deliver(&key(), "hi", &profile(100, 150, 280, 0))
            .await
            .unwrap();

        // ~100ms delay + ~150ms typing before the send.
        assert!(started.elapsed() >= Duration::from_millis(250));
        assert_eq!(outcome.sent_chunks, 1);

        let calls = h.provider.calls();
        assert!(matches!(
            calls[0],
            ProviderCall::SetPresence { state: PresenceState::Composing, .. }
        ));
        assert!(matches!(
            calls[1],
            ProviderCall::SetPresence { state: PresenceState::Available, .. }
        ));
        assert!(matches!(calls[2], ProviderCall::SendMessage { .. }));

        // The lock was released after the typing window.
        assert!(!h.locks.is_locked(&key()));
        assert_eq!(h.stats.snapshot().total_sent, 1);
    }

    #[tokio::test]
    async fn contested_lock_skips_typing_but_delivers() {
        let h = harness();
        // Another holder owns the chat's presence.
        assert!(h.locks.acquire(&key(), Holder::User, "manual takeover"));

        let outcome = h
            .delivery
            .deliver(&key(), "hello", &profile(0, 100, 280, 0))
            .await
            .unwrap();

        assert_eq!(outcome.sent_chunks, 1);
        assert!(h.provider.presence_states().is_empty());
        assert_eq!(h.provider.sent_messages(), vec!["hello"]);
        // The contested lock is untouched.
        assert!(h.locks.is_locked(&key()));
    }

    #[tokio::test]
    async fn presence_failures_never_block_delivery() {
        let h = harness();
        h.provider.fail_presence(true);

        let outcome = h
            .delivery
            .deliver(&key(), "hello", &profile(0, 50, 280, 0))
            .await
            .unwrap();

        assert_eq!(outcome.sent_chunks, 1);
        assert_eq!(h.provider.sent_messages(), vec!["hello"]);
        assert!(!h.locks.is_locked(&key()));
    }

    #[tokio::test]
    async fn long_replies_are_chunked_and_paced() {
        let h = harness();
        let text = "alpha beta gamma delta epsilon zeta";
        let outcome = h
            .delivery
            .deliver(&key(), text, &profile(0, 0, 12, 20))
            .await
            .unwrap();

        assert!(outcome.sent_chunks >= 3);
        let sent = h.provider.sent_messages();
        assert_eq!(sent.len(), outcome.sent_chunks);
        for chunk in &sent {
            assert!(chunk.chars().count() <= 12);
        }
        assert_eq!(sent.join(" "), text);
    }

    #[tokio::test]
    async fn splitting_disabled_sends_one_message() {
        let h = harness();
        let mut p = profile(0, 0, 10, 0);
        p.behavior.message_handling.split_long_messages = false;

        let text = "this text is much longer than ten characters";
        let outcome = h.delivery.deliver(&key(), text, &p).await.unwrap();

        assert_eq!(outcome.sent_chunks, 1);
        assert_eq!(h.provider.sent_messages(), vec![text]);
    }

    #[tokio::test]
    async fn mark_as_read_precedes_the_first_chunk() {
        let h = harness();
        let mut p = profile(0, 0, 280, 0);
        p.behavior.message_handling.mark_as_read = true;

        h.delivery.deliver(&key(), "hi", &p).await.unwrap();

        let calls = h.provider.calls();
        assert!(matches!(calls[0], ProviderCall::MarkRead { .. }));
        assert!(matches!(calls[1], ProviderCall::SendMessage { .. }));
    }

    #[tokio::test]
    async fn session_teardown_cancels_remaining_chunks() {
        let h = harness();
        h.sessions.start_session("i1", "5511999", "client-1");

        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let p = profile(0, 0, 12, 300);

        let delivery = Arc::new(h.delivery);
        let handle = {
            let delivery = delivery.clone();
            tokio::spawn(async move { delivery.deliver(&key(), text, &p).await })
        };

        // Let the first chunk go out, then tear the session down while the
        // pipeline sleeps between chunks.
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.sessions.stop_session(&key());

        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.cancelled);
        assert!(outcome.sent_chunks >= 1);
        assert!(outcome.sent_chunks < outcome.total_chunks);
        assert_eq!(h.provider.sent_messages().len(), outcome.sent_chunks);
    }

    #[tokio::test]
    async fn send_failure_propagates_to_the_caller() {
        let h = harness();
        h.provider.fail_sends(true);

        let result = h
            .delivery
            .deliver(&key(), "hello", &profile(0, 0, 280, 0))
            .await;

        assert!(result.is_err());
        let snap = h.stats.snapshot();
        assert_eq!(snap.total_processed, 1);
        assert_eq!(snap.total_sent, 0);
        assert!(snap.active_chats.is_empty());
    }

    #[tokio::test]
    async fn disabled_presence_system_still_delivers() {
        let h = harness();
        h.locks.set_enabled(false);

        let outcome = h
            .delivery
            .deliver(&key(), "hello", &profile(0, 50, 280, 0))
            .await
            .unwrap();

        // Lock acquisition fails while disabled, so no presence toggles —
        // but the reply is delivered regardless.
        assert_eq!(outcome.sent_chunks, 1);
        assert!(h.provider.presence_states().is_empty());
    }
}
