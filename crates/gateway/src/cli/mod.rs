pub mod config;
pub mod doctor;

use clap::{Parser, Subcommand};

/// Zapflow — conversation orchestration engine for WhatsApp AI assistants.
#[derive(Debug, Parser)]
#[command(name = "zapflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the engine server (default when no subcommand is given).
    Serve,
    /// Run diagnostic checks against the current configuration.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load the configuration from `$ZAPFLOW_CONFIG` (default `zapflow.toml`).
/// A missing file yields the built-in defaults.
pub fn load_config() -> anyhow::Result<(zf_domain::config::Config, String)> {
    let config_path =
        std::env::var("ZAPFLOW_CONFIG").unwrap_or_else(|_| "zapflow.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        zf_domain::config::Config::default()
    };

    Ok((config, config_path))
}
