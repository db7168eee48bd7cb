//! Application state construction and background task startup.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use zf_domain::config::Config;
use zf_domain::profile::ProfileCatalog;
use zf_handoff::HandoffEngine;
use zf_humanizer::{HumanizationStats, HumanizedDelivery};
use zf_presence::{PresenceLockMap, ProfileConfigurator};
use zf_provider::{EvolutionProvider, MessagingProvider};
use zf_sessions::SessionRegistry;

use crate::state::AppState;

/// Build the full application state from configuration, using the
/// production Evolution provider.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let provider: Arc<dyn MessagingProvider> =
        Arc::new(EvolutionProvider::new(&config.provider)?);
    Ok(build_app_state_with(config, provider))
}

/// Build the application state around an explicit provider.  Tests inject a
/// mock here; production goes through [`build_app_state`].
pub fn build_app_state_with(
    config: Arc<Config>,
    provider: Arc<dyn MessagingProvider>,
) -> AppState {
    let locks = Arc::new(PresenceLockMap::new(&config.presence));
    let configurator = Arc::new(ProfileConfigurator::new(locks.clone(), provider.clone()));
    let sessions = Arc::new(SessionRegistry::new(
        config.sessions.clone(),
        configurator.clone(),
    ));
    let stats = Arc::new(HumanizationStats::new());
    let delivery = Arc::new(HumanizedDelivery::new(
        provider.clone(),
        locks.clone(),
        sessions.clone(),
        stats.clone(),
    ));
    let handoff = Arc::new(HandoffEngine::new(config.handoff.queues.clone()));
    let profiles = Arc::new(ProfileCatalog::new(config.profiles.clone()));

    let api_token_hash = read_token_hash(&config.server.api_token_env);
    if api_token_hash.is_none() {
        tracing::warn!(
            env = %config.server.api_token_env,
            "API token env var unset — running unauthenticated (dev mode)"
        );
    }
    let admin_token_hash = read_token_hash(&config.admin.token_env);
    if admin_token_hash.is_none() {
        tracing::warn!(
            env = %config.admin.token_env,
            "admin token env var unset — admin endpoints disabled"
        );
    }

    tracing::info!(
        profiles = profiles.len(),
        handoff_queues = handoff.queue_ids().len(),
        lock_ttl_secs = config.presence.lock_ttl_secs,
        "engine state built"
    );

    AppState {
        config,
        provider,
        locks,
        configurator,
        handoff,
        sessions,
        delivery,
        profiles,
        stats,
        api_token_hash,
        admin_token_hash,
    }
}

/// Spawn the long-running background tokio tasks (expired-lock sweep, stale
/// session sweep, periodic stats log).
///
/// Call this **after** [`build_app_state`] when running the HTTP server.
/// CLI one-shot commands (`doctor`, `config`) skip it.
pub fn spawn_background_tasks(state: &AppState) {
    // ── Periodic expired-lock sweep ─────────────────────────────────
    {
        let locks = state.locks.clone();
        let interval_secs = state.config.presence.sweep_interval_secs;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                let evicted = locks.sweep();
                if evicted > 0 {
                    tracing::debug!(evicted, "expired presence locks swept");
                }
            }
        });
    }

    // ── Periodic stale-session sweep (safety net behind heartbeats) ──
    {
        let sessions = state.sessions.clone();
        let interval_secs = state.config.sessions.sweep_interval_secs;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                let removed = sessions.sweep_stale();
                if removed > 0 {
                    tracing::info!(removed, "stale sessions swept");
                }
            }
        });
    }

    // ── Periodic stats heartbeat ────────────────────────────────────
    {
        let stats = state.stats.clone();
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                let snap = stats.snapshot();
                tracing::info!(
                    total_processed = snap.total_processed,
                    total_sent = snap.total_sent,
                    avg_response_time_ms = snap.avg_response_time_ms as u64,
                    active_chats = snap.active_chats.len(),
                    active_sessions = sessions.active_count(),
                    "humanization stats"
                );
            }
        });
    }
    tracing::info!("background tasks spawned");
}

/// Read a bearer token from the named env var and return its SHA-256
/// digest, or `None` when unset/empty.
fn read_token_hash(env_name: &str) -> Option<Vec<u8>> {
    match std::env::var(env_name) {
        Ok(token) if !token.trim().is_empty() => {
            Some(Sha256::digest(token.trim().as_bytes()).to_vec())
        }
        _ => None,
    }
}
