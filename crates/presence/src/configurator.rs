//! Once-per-instance baseline profile configuration.
//!
//! The remote profile-update call is expensive, so it is memoized per
//! (instance, client) for the process lifetime.  Under concurrent first use
//! the call is single-flighted through the presence lock on a synthetic
//! `"profile"` resource; the lock's TTL bounds how long a crashed
//! configurator can block the key.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use zf_domain::chat_key::{ChatKey, Holder, ProfileKey};
use zf_domain::error::Result;
use zf_domain::trace::TraceEvent;
use zf_provider::{MessagingProvider, ProfileAttributes};

use crate::lock::PresenceLockMap;

/// Synthetic chat id used to serialize profile configuration per instance.
pub const PROFILE_RESOURCE: &str = "profile";

pub struct ProfileConfigurator {
    locks: Arc<PresenceLockMap>,
    provider: Arc<dyn MessagingProvider>,
    configured: Mutex<HashSet<ProfileKey>>,
}

impl ProfileConfigurator {
    pub fn new(locks: Arc<PresenceLockMap>, provider: Arc<dyn MessagingProvider>) -> Self {
        Self {
            locks,
            provider,
            configured: Mutex::new(HashSet::new()),
        }
    }

    /// Push the baseline profile attributes for an instance, at most once.
    ///
    /// Returns `Ok(true)` when the profile is configured (now or earlier),
    /// `Ok(false)` when the attempt was skipped (subsystem disabled, or
    /// another caller is mid-configuration), and `Err` when the provider
    /// call itself failed — the key stays unmarked so a later caller
    /// retries.
    ///
    /// `source` is a diagnostic tag naming who asked ("inbound",
    /// "heartbeat", ...).
    pub async fn configure_once(
        &self,
        instance_id: &str,
        client_id: &str,
        source: &str,
    ) -> Result<bool> {
        if !self.locks.is_enabled() {
            return Ok(false);
        }

        let profile_key = ProfileKey::new(instance_id, client_id);
        if self.configured.lock().contains(&profile_key) {
            return Ok(true);
        }

        // Exclusive: a second configurator (same `System` holder) must be
        // rejected, not treated as an idempotent refresh.
        let resource = ChatKey::new(instance_id, PROFILE_RESOURCE);
        if !self
            .locks
            .acquire_exclusive(&resource, Holder::System, "profile configuration")
        {
            // Another caller is mid-configuration; this one skips.
            return Ok(false);
        }

        // Lost the check-then-lock race: a concurrent caller finished while
        // we were acquiring.
        if self.configured.lock().contains(&profile_key) {
            self.locks.release(&resource, Holder::System);
            return Ok(true);
        }

        let result = self
            .provider
            .update_profile(instance_id, client_id, &ProfileAttributes::baseline())
            .await;

        if result.is_ok() {
            self.configured.lock().insert(profile_key);
            TraceEvent::ProfileConfigured {
                instance_id: instance_id.to_owned(),
                client_id: client_id.to_owned(),
                source: source.to_owned(),
            }
            .emit();
        }

        self.locks.release(&resource, Holder::System);
        result.map(|()| true)
    }

    pub fn is_configured(&self, instance_id: &str, client_id: &str) -> bool {
        self.configured
            .lock()
            .contains(&ProfileKey::new(instance_id, client_id))
    }

    /// Forget one mark so the next `configure_once` re-runs the remote call.
    pub fn invalidate(&self, instance_id: &str, client_id: &str) -> bool {
        self.configured
            .lock()
            .remove(&ProfileKey::new(instance_id, client_id))
    }

    /// Forget every mark.  Returns how many were dropped.
    pub fn invalidate_all(&self) -> usize {
        let mut configured = self.configured.lock();
        let count = configured.len();
        configured.clear();
        count
    }

    pub fn configured_count(&self) -> usize {
        self.configured.lock().len()
    }
}
