//! `zapflow doctor` — diagnostic checks against the current configuration.
//!
//! Checks are non-destructive: config validity, token env vars, provider
//! reachability, catalog/trigger sanity.  Exit status reflects the result.

use zf_domain::config::{Config, ConfigSeverity};

/// Run all checks and print a report.  Returns `true` when everything
/// required passed (warnings do not fail the run).
pub async fn run(config: &Config, config_path: &str) -> anyhow::Result<bool> {
    let mut passed = true;
    println!("zapflow doctor — {config_path}\n");

    // ── Config validation ───────────────────────────────────────────
    let issues = config.validate();
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        passed = false;
        println!("✗ configuration: {errors} error(s)");
        for issue in &issues {
            println!("    {issue}");
        }
    } else if !issues.is_empty() {
        println!("⚠ configuration: {} warning(s)", issues.len());
        for issue in &issues {
            println!("    {issue}");
        }
    } else {
        println!("✓ configuration valid");
    }

    // ── Token env vars ──────────────────────────────────────────────
    for (label, env) in [
        ("API token", config.server.api_token_env.as_str()),
        ("admin token", config.admin.token_env.as_str()),
        ("provider API key", config.provider.api_key_env.as_str()),
    ] {
        match std::env::var(env) {
            Ok(v) if !v.trim().is_empty() => println!("✓ {label} set ({env})"),
            _ => println!("⚠ {label} unset ({env})"),
        }
    }

    // ── Provider reachability ───────────────────────────────────────
    if config.provider.base_url.is_empty() {
        println!("⚠ provider base_url is empty — skipping reachability check");
    } else {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;
        match client.get(&config.provider.base_url).send().await {
            Ok(resp) => println!(
                "✓ provider reachable at {} (HTTP {})",
                config.provider.base_url,
                resp.status().as_u16()
            ),
            Err(e) => {
                // Reachability is informative, not fatal: the engine starts
                // without the provider and degrades per-call.
                println!("⚠ provider unreachable at {}: {e}", config.provider.base_url);
            }
        }
    }

    // ── Catalog & triggers ──────────────────────────────────────────
    println!(
        "✓ {} humanization profile(s), {} handoff queue(s)",
        config.profiles.len(),
        config.handoff.queues.len()
    );

    println!("\n{}", if passed { "all checks passed" } else { "checks FAILED" });
    Ok(passed)
}
