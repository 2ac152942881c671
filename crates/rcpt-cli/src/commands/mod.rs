//! Subcommands.

pub mod config;
pub mod extract;
pub mod models;
pub mod recognize;

use std::path::{Path, PathBuf};

use anyhow::Context;
use rcpt_core::RcptConfig;
use tracing::debug;

/// `<config dir>/rcpt/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rcpt")
        .join("config.json")
}

/// The explicit path, else the default one.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Load configuration.
///
/// An explicit path must exist. A missing default file yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<RcptConfig> {
    let path = config_path(explicit);
    if explicit.is_none() && !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(RcptConfig::default());
    }
    debug!("Loading config from {}", path.display());
    let config = RcptConfig::from_file(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
