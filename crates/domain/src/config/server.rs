use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    /// Environment variable holding the API bearer token.  If the env var is
    /// unset or empty, the server runs unauthenticated (dev mode) with a
    /// startup warning.
    #[serde(default = "d_api_token_env")]
    pub api_token_env: String,
    /// Allowed CORS origin for the dashboard.  `"*"` allows any origin.
    #[serde(default = "d_cors_origin")]
    pub cors_origin: String,
    /// Emit log lines as JSON (structured ingestion) instead of plain text.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: d_host(),
            port: d_port(),
            api_token_env: d_api_token_env(),
            cors_origin: d_cors_origin(),
            log_json: false,
        }
    }
}

fn d_host() -> String {
    "127.0.0.1".into()
}
fn d_port() -> u16 {
    8430
}
fn d_api_token_env() -> String {
    "ZF_API_TOKEN".into()
}
fn d_cors_origin() -> String {
    "*".into()
}
