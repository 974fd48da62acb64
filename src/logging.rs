#![forbid(unsafe_code)]

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LogConfig};

/// Overrides `log.level` when set.
pub const LOG_ENV: &str = "TINTTODO_LOG";

/// Installs a file-backed `tracing` subscriber. The terminal belongs to the
/// UI, so nothing is installed when no log file is configured.
pub fn init(cfg: &LogConfig, file_override: Option<&Path>) -> anyhow::Result<bool> {
    let path = match file_override {
        Some(p) => p.to_path_buf(),
        None if cfg.file.trim().is_empty() => return Ok(false),
        None => config::expand_path(cfg.file.trim())?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = build_filter(cfg.level.trim(), std::env::var(LOG_ENV).ok().as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(true)
}

fn build_filter(level: &str, env_override: Option<&str>) -> anyhow::Result<EnvFilter> {
    let directive = env_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(level);
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter '{directive}'"))
}
