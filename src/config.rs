use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poll::OnError;

/// Shape of settings.toml on disk
///
/// Example:
/// days = 3
/// timeout_secs = 30
/// user_agent = "rsspoll"
/// keep_going = false
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    pub days: Option<i64>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub keep_going: Option<bool>,
}

/// Resolved config used by the app
#[derive(Debug, Clone)]
pub struct Config {
    pub days: i64,
    pub feeds_path: PathBuf,
    pub timeout: Duration,
    pub user_agent: String,
    pub on_error: OnError,
}

/// Directory holding config.txt and settings.toml
fn app_config_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join("rsspoll"))
}

/// Load settings from `path` if the file exists
pub fn load_settings(path: &Path) -> Result<RawSettings> {
    if !path.exists() {
        return Ok(RawSettings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings '{}'", path.display()))?;
    let raw = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse settings '{}'", path.display()))?;
    Ok(raw)
}

/// Build the run configuration from the command line and
/// ~/.config/rsspoll/settings.toml, falling back to defaults:
///
/// days = 1
/// timeout_secs = 30
/// user_agent = "rsspoll/<version>"
/// keep_going = false
pub fn load_config(days: Option<i64>, file: Option<PathBuf>) -> Result<Config> {
    let dir = app_config_dir();

    let raw = match &dir {
        Some(dir) => load_settings(&dir.join("settings.toml"))?,
        None => RawSettings::default(),
    };

    resolve(raw, dir.as_deref(), days, file)
}

/// Merge settings with command-line values. The command line wins.
pub fn resolve(
    raw: RawSettings,
    dir: Option<&Path>,
    days: Option<i64>,
    file: Option<PathBuf>,
) -> Result<Config> {
    let feeds_path = match file {
        Some(path) => path,
        None => dir
            .map(|d| d.join("config.txt"))
            .ok_or_else(|| anyhow!("could not determine user config directory"))?,
    };

    let days = days.or(raw.days).unwrap_or(1);

    let timeout = Duration::from_secs(raw.timeout_secs.unwrap_or(30));

    let user_agent = raw
        .user_agent
        .unwrap_or_else(|| format!("rsspoll/{}", env!("CARGO_PKG_VERSION")));

    let on_error = if raw.keep_going.unwrap_or(false) {
        OnError::Continue
    } else {
        OnError::Abort
    };

    Ok(Config {
        days,
        feeds_path,
        timeout,
        user_agent,
        on_error,
    })
}
