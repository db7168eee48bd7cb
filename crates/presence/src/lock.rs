//! Per-chat presence locks.
//!
//! An advisory lock table keyed by [`ChatKey`].  Locks carry a TTL and are
//! evicted lazily on access, so a crashed holder can wedge a chat for at most
//! one TTL.  Contention is the expected concurrency-control signal, not an
//! error: a failed `acquire` means "skip this presence action this cycle".
//!
//! The global enable switch lets an operator halt every presence side effect
//! at once: while disabled, `acquire` always fails and `is_locked` always
//! reports false, without touching the stored entries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use zf_domain::chat_key::{ChatKey, Holder};
use zf_domain::config::PresenceConfig;
use zf_domain::trace::TraceEvent;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lock entry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
struct PresenceLock {
    holder: Holder,
    acquired_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    reason: String,
}

impl PresenceLock {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Diagnostic view of one live lock.
#[derive(Debug, Clone, Serialize)]
pub struct LockInfo {
    pub chat_key: String,
    pub holder: Holder,
    pub acquired_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub reason: String,
}

/// Diagnostic snapshot of the whole subsystem.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceStatus {
    pub system_disabled: bool,
    pub active_locks: usize,
    pub locks: Vec<LockInfo>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lock map
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Advisory per-chat lock table with TTL expiry and a global kill switch.
pub struct PresenceLockMap {
    locks: Mutex<HashMap<ChatKey, PresenceLock>>,
    ttl: Duration,
    enabled: AtomicBool,
}

impl PresenceLockMap {
    pub fn new(config: &PresenceConfig) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(config.lock_ttl_secs as i64),
            enabled: AtomicBool::new(config.enabled),
        }
    }

    /// Try to take the lock for `chat_key` on behalf of `holder`.
    ///
    /// Returns `false` when an unexpired lock with a *different* holder
    /// exists (or the subsystem is disabled).  Re-acquisition by the current
    /// holder refreshes the TTL and returns `true`.
    pub fn acquire(&self, chat_key: &ChatKey, holder: Holder, reason: &str) -> bool {
        self.acquire_at(chat_key, holder, reason, Utc::now())
    }

    pub(crate) fn acquire_at(
        &self,
        chat_key: &ChatKey,
        holder: Holder,
        reason: &str,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let mut locks = self.locks.lock();
        let refreshed = match locks.get(chat_key) {
            Some(existing) if !existing.is_expired(now) => {
                if existing.holder != holder {
                    TraceEvent::LockContended {
                        chat_key: chat_key.to_string(),
                        holder: holder.to_string(),
                        held_by: existing.holder.to_string(),
                    }
                    .emit();
                    return false;
                }
                true
            }
            _ => false,
        };

        locks.insert(
            chat_key.clone(),
            PresenceLock {
                holder,
                acquired_at: now,
                expires_at: now + self.ttl,
                reason: reason.to_owned(),
            },
        );

        TraceEvent::LockAcquired {
            chat_key: chat_key.to_string(),
            holder: holder.to_string(),
            refreshed,
        }
        .emit();

        true
    }

    /// Single-flight variant of [`acquire`](Self::acquire): fails while *any*
    /// unexpired lock exists, including one held by `holder` itself.  Used to
    /// guard critical sections where re-entry must be rejected, not
    /// refreshed (profile configuration).
    pub fn acquire_exclusive(&self, chat_key: &ChatKey, holder: Holder, reason: &str) -> bool {
        self.acquire_exclusive_at(chat_key, holder, reason, Utc::now())
    }

    pub(crate) fn acquire_exclusive_at(
        &self,
        chat_key: &ChatKey,
        holder: Holder,
        reason: &str,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let mut locks = self.locks.lock();
        if let Some(existing) = locks.get(chat_key) {
            if !existing.is_expired(now) {
                TraceEvent::LockContended {
                    chat_key: chat_key.to_string(),
                    holder: holder.to_string(),
                    held_by: existing.holder.to_string(),
                }
                .emit();
                return false;
            }
        }

        locks.insert(
            chat_key.clone(),
            PresenceLock {
                holder,
                acquired_at: now,
                expires_at: now + self.ttl,
                reason: reason.to_owned(),
            },
        );

        TraceEvent::LockAcquired {
            chat_key: chat_key.to_string(),
            holder: holder.to_string(),
            refreshed: false,
        }
        .emit();

        true
    }

    /// Release the lock, but only if `holder` actually owns it.  A mismatched
    /// release is a logged no-op so one component can never free another's
    /// lock.
    pub fn release(&self, chat_key: &ChatKey, holder: Holder) {
        let mut locks = self.locks.lock();
        match locks.get(chat_key) {
            Some(existing) if existing.holder == holder => {
                locks.remove(chat_key);
                TraceEvent::LockReleased {
                    chat_key: chat_key.to_string(),
                    holder: holder.to_string(),
                }
                .emit();
            }
            Some(existing) => {
                tracing::warn!(
                    chat_key = %chat_key,
                    held_by = %existing.holder,
                    released_by = %holder,
                    "presence lock release by non-holder ignored"
                );
            }
            None => {}
        }
    }

    /// Report whether an unexpired lock exists, evicting a stale entry on
    /// the way.  Always `false` while the subsystem is disabled.
    pub fn is_locked(&self, chat_key: &ChatKey) -> bool {
        self.is_locked_at(chat_key, Utc::now())
    }

    pub(crate) fn is_locked_at(&self, chat_key: &ChatKey, now: DateTime<Utc>) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let mut locks = self.locks.lock();
        match locks.get(chat_key) {
            Some(existing) if existing.is_expired(now) => {
                locks.remove(chat_key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Unconditionally empty the lock table.  Operator escape hatch, used
    /// when the subsystem is globally disabled.  Returns the evicted count.
    pub fn clear_all(&self) -> usize {
        let mut locks = self.locks.lock();
        let count = locks.len();
        locks.clear();
        TraceEvent::LocksCleared { count }.emit();
        count
    }

    /// Evict every expired entry.  Called by the background sweeper so the
    /// table does not accumulate garbage between accesses.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub(crate) fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut locks = self.locks.lock();
        let before = locks.len();
        locks.retain(|_, lock| !lock.is_expired(now));
        before - locks.len()
    }

    /// Global kill switch.  Read before every lock operation.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "presence subsystem toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Diagnostics snapshot (expired entries pruned first).
    pub fn status(&self) -> PresenceStatus {
        self.status_at(Utc::now())
    }

    pub(crate) fn status_at(&self, now: DateTime<Utc>) -> PresenceStatus {
        self.sweep_at(now);
        let locks = self.locks.lock();
        let mut infos: Vec<LockInfo> = locks
            .iter()
            .map(|(key, lock)| LockInfo {
                chat_key: key.to_string(),
                holder: lock.holder,
                acquired_at: lock.acquired_at,
                expires_at: lock.expires_at,
                reason: lock.reason.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.chat_key.cmp(&b.chat_key));

        PresenceStatus {
            system_disabled: !self.is_enabled(),
            active_locks: infos.len(),
            locks: infos,
        }
    }
}
