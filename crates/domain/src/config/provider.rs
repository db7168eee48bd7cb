use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Messaging provider (Evolution-API-compatible)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the WhatsApp business provider, e.g. `http://localhost:8080`.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the provider API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout.
    #[serde(default = "d_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            timeout_secs: d_timeout(),
        }
    }
}

fn d_base_url() -> String {
    "http://localhost:8080".into()
}
fn d_api_key_env() -> String {
    "ZF_PROVIDER_API_KEY".into()
}
fn d_timeout() -> u64 {
    15
}
