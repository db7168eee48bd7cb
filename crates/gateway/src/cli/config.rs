//! `zapflow config validate|show`.

use zf_domain::config::{Config, ConfigSeverity};

/// Validate the config and print every issue.  Returns `true` when no
/// error-severity issues were found.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("{config_path}: OK");
        return true;
    }

    for issue in &issues {
        println!("{issue}");
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    println!(
        "{config_path}: {} issue(s), {errors} error(s)",
        issues.len()
    );
    errors == 0
}

/// Dump the resolved configuration (defaults applied) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to render config: {e}"),
    }
}
