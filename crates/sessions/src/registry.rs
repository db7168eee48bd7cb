//! Session registry with per-session heartbeats.
//!
//! `start_session` is idempotent per chat key and spawns the session's
//! heartbeat on first start.  The heartbeat ticks at a fixed cadence,
//! re-asserting profile presence while the chat is inside the inactivity
//! window and removing its own entry once the window passes, so no timer
//! outlives its session.  `stop_session` is the explicit path: it aborts the
//! heartbeat before dropping the entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use zf_domain::chat_key::ChatKey;
use zf_domain::config::SessionsConfig;
use zf_domain::trace::TraceEvent;
use zf_presence::ProfileConfigurator;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session entry & snapshot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct SessionEntry {
    session_id: String,
    client_id: String,
    started_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    heartbeat: Option<tokio::task::JoinHandle<()>>,
}

/// Owned snapshot of one session, safe to hand to API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub session_id: String,
    pub instance_id: String,
    pub chat_id: String,
    pub client_id: String,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

struct Shared {
    sessions: RwLock<HashMap<ChatKey, SessionEntry>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionRegistry {
    shared: Arc<Shared>,
    config: SessionsConfig,
    configurator: Arc<ProfileConfigurator>,
}

impl SessionRegistry {
    pub fn new(config: SessionsConfig, configurator: Arc<ProfileConfigurator>) -> Self {
        Self {
            shared: Arc::new(Shared {
                sessions: RwLock::new(HashMap::new()),
            }),
            config,
            configurator,
        }
    }

    /// Start (or refresh) the session for a chat.  Idempotent: an existing
    /// session just gets an activity mark.  The heartbeat task is spawned on
    /// first start only.
    pub fn start_session(
        &self,
        instance_id: &str,
        chat_id: &str,
        client_id: &str,
    ) -> ChatSession {
        let key = ChatKey::new(instance_id, chat_id);
        let now = Utc::now();

        {
            let mut sessions = self.shared.sessions.write();
            if let Some(entry) = sessions.get_mut(&key) {
                entry.last_activity_at = now;
                return snapshot(&key, entry, now, &self.config);
            }
        }

        let heartbeat = self.spawn_heartbeat(key.clone(), client_id.to_owned());
        let entry = SessionEntry {
            session_id: uuid::Uuid::new_v4().to_string(),
            client_id: client_id.to_owned(),
            started_at: now,
            last_activity_at: now,
            heartbeat: Some(heartbeat),
        };
        let session = snapshot(&key, &entry, now, &self.config);
        self.shared.sessions.write().insert(key.clone(), entry);

        TraceEvent::SessionStarted {
            chat_key: key.to_string(),
            client_id: client_id.to_owned(),
        }
        .emit();

        session
    }

    /// Refresh the activity timestamp.  Returns `false` for an unknown chat.
    /// This is the only way to keep a session alive past the inactivity
    /// window.
    pub fn mark_activity(&self, key: &ChatKey) -> bool {
        let mut sessions = self.shared.sessions.write();
        match sessions.get_mut(key) {
            Some(entry) => {
                entry.last_activity_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Tear a session down explicitly: abort the heartbeat, drop the entry.
    pub fn stop_session(&self, key: &ChatKey) -> bool {
        let entry = self.shared.sessions.write().remove(key);
        match entry {
            Some(entry) => {
                if let Some(handle) = entry.heartbeat {
                    handle.abort();
                }
                TraceEvent::SessionStopped {
                    chat_key: key.to_string(),
                }
                .emit();
                true
            }
            None => false,
        }
    }

    /// Whether the chat has a live session inside the inactivity window.
    /// Consulted by the delivery pipeline between chunks.
    pub fn is_active(&self, key: &ChatKey) -> bool {
        self.is_active_at(key, Utc::now())
    }

    fn is_active_at(&self, key: &ChatKey, now: DateTime<Utc>) -> bool {
        let sessions = self.shared.sessions.read();
        sessions
            .get(key)
            .map(|entry| !is_stale(entry, now, &self.config))
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.shared.sessions.read().len()
    }

    /// Owned snapshots of every tracked session.
    pub fn list(&self) -> Vec<ChatSession> {
        let now = Utc::now();
        let sessions = self.shared.sessions.read();
        let mut list: Vec<ChatSession> = sessions
            .iter()
            .map(|(key, entry)| snapshot(key, entry, now, &self.config))
            .collect();
        list.sort_by(|a, b| {
            (a.instance_id.as_str(), a.chat_id.as_str())
                .cmp(&(b.instance_id.as_str(), b.chat_id.as_str()))
        });
        list
    }

    /// Registry-wide stale sweep — the safety net behind per-session
    /// heartbeats (covers heartbeats lost to runtime shutdown or panic).
    /// Returns how many sessions were torn down.
    pub fn sweep_stale(&self) -> usize {
        self.sweep_stale_at(Utc::now())
    }

    fn sweep_stale_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.shared.sessions.write();
        let before = sessions.len();
        let stale: Vec<ChatKey> = sessions
            .iter()
            .filter(|(_, entry)| is_stale(entry, now, &self.config))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            if let Some(entry) = sessions.remove(key) {
                if let Some(handle) = entry.heartbeat {
                    handle.abort();
                }
                TraceEvent::SessionExpired {
                    chat_key: key.to_string(),
                    idle_secs: (now - entry.last_activity_at).num_seconds(),
                }
                .emit();
            }
        }
        before - sessions.len()
    }

    fn spawn_heartbeat(&self, key: ChatKey, client_id: String) -> tokio::task::JoinHandle<()> {
        let shared = self.shared.clone();
        let configurator = self.configurator.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(config.heartbeat_interval_secs));
            // The first tick completes immediately; consume it so the loop
            // body runs on the configured cadence.
            interval.tick().await;

            loop {
                interval.tick().await;
                let now = Utc::now();

                let idle_secs = {
                    let sessions = shared.sessions.read();
                    match sessions.get(&key) {
                        Some(entry) => (now - entry.last_activity_at).num_seconds(),
                        // Entry vanished (explicit stop raced the abort) —
                        // nothing left to do.
                        None => return,
                    }
                };

                if idle_secs > config.inactivity_timeout_secs as i64 {
                    shared.sessions.write().remove(&key);
                    TraceEvent::SessionExpired {
                        chat_key: key.to_string(),
                        idle_secs,
                    }
                    .emit();
                    return;
                }

                // Still active: re-assert profile presence.  Best-effort —
                // contention and provider hiccups resolve on a later tick.
                if let Err(e) = configurator
                    .configure_once(&key.instance_id, &client_id, "heartbeat")
                    .await
                {
                    tracing::warn!(chat_key = %key, error = %e, "heartbeat profile assert failed");
                }
            }
        })
    }
}

fn is_stale(entry: &SessionEntry, now: DateTime<Utc>, config: &SessionsConfig) -> bool {
    (now - entry.last_activity_at).num_seconds() > config.inactivity_timeout_secs as i64
}

fn snapshot(
    key: &ChatKey,
    entry: &SessionEntry,
    now: DateTime<Utc>,
    config: &SessionsConfig,
) -> ChatSession {
    ChatSession {
        session_id: entry.session_id.clone(),
        instance_id: key.instance_id.clone(),
        chat_id: key.chat_id.clone(),
        client_id: entry.client_id.clone(),
        is_active: !is_stale(entry, now, config),
        started_at: entry.started_at,
        last_activity_at: entry.last_activity_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use zf_domain::config::PresenceConfig;
    use zf_presence::PresenceLockMap;
    use zf_provider::{MessagingProvider, MockProvider};

    fn registry_with(config: SessionsConfig) -> (SessionRegistry, Arc<MockProvider>) {
        let locks = Arc::new(PresenceLockMap::new(&PresenceConfig::default()));
        let provider = Arc::new(MockProvider::new());
        let configurator = Arc::new(ProfileConfigurator::new(
            locks,
            provider.clone() as Arc<dyn MessagingProvider>,
        ));
        (SessionRegistry::new(config, configurator), provider)
    }

    fn default_registry() -> (SessionRegistry, Arc<MockProvider>) {
        registry_with(SessionsConfig::default())
    }

    #[tokio::test]
    async fn start_session_is_idempotent() {
        let (registry, _) = default_registry();
        let first = registry.start_session("i1", "chat-1", "client-1");
        let second = registry.start_session("i1", "chat-1", "client-1");

        assert_eq!(registry.active_count(), 1);
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(first.started_at, second.started_at);
        assert!(second.is_active);
    }

    #[tokio::test]
    async fn mark_activity_only_for_known_sessions() {
        let (registry, _) = default_registry();
        let key = ChatKey::new("i1", "chat-1");
        assert!(!registry.mark_activity(&key));

        registry.start_session("i1", "chat-1", "client-1");
        assert!(registry.mark_activity(&key));
    }

    #[tokio::test]
    async fn stop_session_removes_and_is_idempotent() {
        let (registry, _) = default_registry();
        let key = ChatKey::new("i1", "chat-1");
        registry.start_session("i1", "chat-1", "client-1");

        assert!(registry.stop_session(&key));
        assert!(!registry.is_active(&key));
        assert_eq!(registry.active_count(), 0);
        assert!(!registry.stop_session(&key));
    }

    #[tokio::test]
    async fn sweep_only_removes_sessions_past_the_window() {
        let (registry, _) = default_registry();
        registry.start_session("i1", "a", "client-1");
        registry.start_session("i1", "b", "client-1");

        // Inside the 120s default window: nothing to do.
        let removed = registry.sweep_stale_at(Utc::now() + ChronoDuration::seconds(60));
        assert_eq!(removed, 0);
        assert_eq!(registry.active_count(), 2);

        // Past the window: both go, heartbeats and all.
        let removed = registry.sweep_stale_at(Utc::now() + ChronoDuration::seconds(121));
        assert_eq!(removed, 2);
        assert_eq!(registry.active_count(), 0);
    }

    #[tokio::test]
    async fn heartbeat_tears_down_idle_session() {
        let (registry, provider) = registry_with(SessionsConfig {
            inactivity_timeout_secs: 1,
            heartbeat_interval_secs: 1,
            sweep_interval_secs: 60,
        });
        let key = ChatKey::new("i1", "chat-1");
        registry.start_session("i1", "chat-1", "client-1");
        assert!(registry.is_active(&key));

        // First tick (~1s) is inside the window and asserts the profile;
        // a later tick finds the session idle past 1s and removes it.
        tokio::time::sleep(Duration::from_millis(3_200)).await;
        assert_eq!(registry.active_count(), 0);
        assert!(!registry.is_active(&key));
        assert!(provider.profile_call_count() >= 1);
    }
}
