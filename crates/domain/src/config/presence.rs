use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Presence locking
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Advisory lock time-to-live.  A crashed or forgotten holder can wedge
    /// a chat for at most this long.
    #[serde(default = "d_lock_ttl")]
    pub lock_ttl_secs: u64,
    /// Start with the presence subsystem enabled.  Operators can flip this
    /// at runtime through the admin API.
    #[serde(default = "d_true")]
    pub enabled: bool,
    /// Interval of the background sweep that evicts expired locks.
    #[serde(default = "d_sweep")]
    pub sweep_interval_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            lock_ttl_secs: d_lock_ttl(),
            enabled: true,
            sweep_interval_secs: d_sweep(),
        }
    }
}

fn d_lock_ttl() -> u64 {
    30
}
fn d_sweep() -> u64 {
    30
}
fn d_true() -> bool {
    true
}
