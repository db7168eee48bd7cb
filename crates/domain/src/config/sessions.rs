use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// A session with no activity for this long is torn down and its
    /// heartbeat cancelled.
    #[serde(default = "d_inactivity")]
    pub inactivity_timeout_secs: u64,
    /// Cadence of the per-session heartbeat that re-asserts profile
    /// presence while the chat is active.
    #[serde(default = "d_heartbeat")]
    pub heartbeat_interval_secs: u64,
    /// Interval of the registry-wide stale sweep (safety net behind the
    /// per-session heartbeats).
    #[serde(default = "d_sweep")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: d_inactivity(),
            heartbeat_interval_secs: d_heartbeat(),
            sweep_interval_secs: d_sweep(),
        }
    }
}

fn d_inactivity() -> u64 {
    120
}
fn d_heartbeat() -> u64 {
    25
}
fn d_sweep() -> u64 {
    60
}
