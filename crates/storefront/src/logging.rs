//! File-only tracing setup. The terminal belongs to the UI, so nothing is
//! ever written to stdout or stderr.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter precedence: `RUST_LOG`, then the configured level, then `warn`.
fn directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|value| !value.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))
}

/// Install the global subscriber when a log file is configured.
///
/// Returns `false` (and installs nothing) when `path` is `None`.
pub fn init(path: Option<&Path>, level: Option<&str>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = open_log_file(path)?;
    let directive = directive(std::env::var(EnvFilter::DEFAULT_ENV).ok(), level);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("could not install the log subscriber")?;
    Ok(true)
}
