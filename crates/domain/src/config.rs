mod handoff;
mod presence;
mod provider;
mod server;
mod sessions;

pub use handoff::*;
pub use presence::*;
pub use provider::*;
pub use server::*;
pub use sessions::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::profile::HumanizationProfile;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub handoff: HandoffConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    /// Humanization profile catalog (key = profile id).
    #[serde(default)]
    pub profiles: HashMap<String, HumanizationProfile>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Admin
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Environment variable holding the admin bearer token.
    /// If the env var is unset, admin endpoints are **disabled** (403).
    #[serde(default = "d_admin_token_env")]
    pub token_env: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token_env: d_admin_token_env(),
        }
    }
}

fn d_admin_token_env() -> String {
    "ZF_ADMIN_TOKEN".into()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub section: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "error",
            ConfigSeverity::Warning => "warning",
        };
        write!(f, "[{tag}] {}: {}", self.section, self.message)
    }
}

impl Config {
    /// Validate the whole configuration.  Errors make the config unusable;
    /// warnings are surfaced but tolerated.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();

        if self.server.port == 0 {
            issues.push(err("server", "port must be non-zero"));
        }
        if self.presence.lock_ttl_secs == 0 {
            issues.push(err("presence", "lock_ttl_secs must be > 0"));
        }
        if self.sessions.inactivity_timeout_secs == 0 {
            issues.push(err("sessions", "inactivity_timeout_secs must be > 0"));
        }
        if self.sessions.heartbeat_interval_secs == 0 {
            issues.push(err("sessions", "heartbeat_interval_secs must be > 0"));
        }
        if self.sessions.heartbeat_interval_secs >= self.sessions.inactivity_timeout_secs {
            issues.push(warn(
                "sessions",
                "heartbeat_interval_secs >= inactivity_timeout_secs — sessions may expire between heartbeats",
            ));
        }

        if self.provider.base_url.is_empty() {
            issues.push(warn("provider", "base_url is empty — provider calls will fail"));
        }

        for (id, profile) in &self.profiles {
            if let Err(msg) = profile.check() {
                issues.push(err(&format!("profiles.{id}"), &msg));
            }
        }

        for (queue_id, triggers) in &self.handoff.queues {
            for (idx, trigger) in triggers.iter().enumerate() {
                let section = format!("handoff.queues.{queue_id}[{idx}]");
                if trigger.keywords.is_empty() {
                    issues.push(warn(&section, "trigger has no keywords and can never match"));
                }
                if trigger.keywords.iter().any(|k| k.trim().is_empty()) {
                    issues.push(err(&section, "empty keyword"));
                }
                // Self-loop transfers are rejected here, not re-checked by the
                // engine at evaluation time.
                if trigger.target_queue_id == *queue_id {
                    issues.push(err(&section, "target_queue_id equals the owning queue"));
                }
            }
        }

        issues
    }

    /// True when validation produced no `Error`-severity issues.
    pub fn is_usable(&self) -> bool {
        !self
            .validate()
            .iter()
            .any(|i| i.severity == ConfigSeverity::Error)
    }
}

fn err(section: &str, message: &str) -> ConfigError {
    ConfigError {
        severity: ConfigSeverity::Error,
        section: section.to_owned(),
        message: message.to_owned(),
    }
}

fn warn(section: &str, message: &str) -> ConfigError {
    ConfigError {
        severity: ConfigSeverity::Warning,
        section: section.to_owned(),
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::HandoffTrigger;

    #[test]
    fn default_config_is_usable() {
        let config = Config::default();
        assert!(config.is_usable(), "{:?}", config.validate());
    }

    #[test]
    fn self_loop_trigger_rejected() {
        let mut config = Config::default();
        config.handoff.queues.insert(
            "support".into(),
            vec![HandoffTrigger {
                keywords: vec!["billing".into()],
                target_queue_id: "support".into(),
                enabled: true,
                priority: 0,
            }],
        );
        assert!(!config.is_usable());
    }

    #[test]
    fn invalid_profile_bounds_rejected() {
        let mut config = Config::default();
        let mut profile = HumanizationProfile::default();
        profile.behavior.typing.min_duration_ms = 9_000;
        profile.behavior.typing.max_duration_ms = 1_000;
        config.profiles.insert("broken".into(), profile);
        assert!(!config.is_usable());
    }
}
