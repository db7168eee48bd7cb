use std::sync::Arc;

use zf_domain::config::Config;
use zf_domain::profile::ProfileCatalog;
use zf_handoff::HandoffEngine;
use zf_humanizer::{HumanizationStats, HumanizedDelivery};
use zf_presence::{PresenceLockMap, ProfileConfigurator};
use zf_provider::MessagingProvider;
use zf_sessions::SessionRegistry;

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services** — config, messaging provider
/// - **Presence** — lock table, profile configurator
/// - **Orchestration** — handoff engine, session registry, delivery pipeline
/// - **Observability** — humanization stats
/// - **Security (startup-computed)** — token hashes
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub provider: Arc<dyn MessagingProvider>,

    // ── Presence ──────────────────────────────────────────────────────
    pub locks: Arc<PresenceLockMap>,
    pub configurator: Arc<ProfileConfigurator>,

    // ── Orchestration ─────────────────────────────────────────────────
    pub handoff: Arc<HandoffEngine>,
    pub sessions: Arc<SessionRegistry>,
    pub delivery: Arc<HumanizedDelivery>,
    pub profiles: Arc<ProfileCatalog>,

    // ── Observability ─────────────────────────────────────────────────
    pub stats: Arc<HumanizationStats>,

    // ── Security (startup-computed) ───────────────────────────────────
    /// SHA-256 hash of the API bearer token (read once at startup).
    /// `None` = dev mode (no auth enforced).
    pub api_token_hash: Option<Vec<u8>>,
    /// SHA-256 hash of the admin bearer token (read once at startup).
    /// `None` = admin endpoints disabled.
    pub admin_token_hash: Option<Vec<u8>>,
}
