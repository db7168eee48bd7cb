//! Config parsing: every section must deserialize from an empty TOML
//! document with sensible defaults, and realistic fragments must land in
//! the right fields.

use zf_domain::config::{Config, ConfigSeverity};

#[test]
fn empty_toml_yields_defaults() {
    let config: Config = toml::from_str("").expect("empty config must parse");

    assert_eq!(config.server.port, 8430);
    assert_eq!(config.presence.lock_ttl_secs, 30);
    assert_eq!(config.sessions.inactivity_timeout_secs, 120);
    assert_eq!(config.sessions.heartbeat_interval_secs, 25);
    assert!(config.presence.enabled);
    assert!(config.profiles.is_empty());
    assert!(config.handoff.queues.is_empty());
}

#[test]
fn realistic_config_parses() {
    let raw = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [provider]
        base_url = "http://evolution:8080"

        [presence]
        lock_ttl_secs = 45

        [profiles.snappy]
        name = "Snappy"
        tone = "casual"
        typing_speed_wpm = 80

        [profiles.snappy.response_delay]
        min_ms = 200
        max_ms = 600

        [profiles.snappy.behavior.message_handling]
        split_long_messages = true
        max_chars_per_chunk = 160

        [[handoff.queues.support]]
        keywords = ["billing", "invoice"]
        target_queue_id = "finance"
        priority = 1

        [[handoff.queues.support]]
        keywords = ["help"]
        target_queue_id = "human"
        priority = 2
    "#;

    let config: Config = toml::from_str(raw).expect("config must parse");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.presence.lock_ttl_secs, 45);

    let snappy = &config.profiles["snappy"];
    assert_eq!(snappy.typing_speed_wpm, 80);
    assert_eq!(snappy.response_delay.min_ms, 200);
    assert_eq!(snappy.behavior.message_handling.max_chars_per_chunk, 160);
    // Unspecified nested section falls back to defaults.
    assert!(snappy.behavior.typing.enabled);

    let triggers = &config.handoff.queues["support"];
    assert_eq!(triggers.len(), 2);
    assert_eq!(triggers[0].target_queue_id, "finance");

    assert!(config.is_usable());
}

#[test]
fn validation_flags_are_ordered_by_section() {
    let raw = r#"
        [presence]
        lock_ttl_secs = 0

        [[handoff.queues.sales]]
        keywords = ["vip"]
        target_queue_id = "sales"
    "#;
    let config: Config = toml::from_str(raw).unwrap();
    let issues = config.validate();

    assert!(issues
        .iter()
        .any(|i| i.section == "presence" && i.severity == ConfigSeverity::Error));
    assert!(issues
        .iter()
        .any(|i| i.section.starts_with("handoff.queues.sales") && i.severity == ConfigSeverity::Error));
    assert!(!config.is_usable());
}
