//! Configuration loading and discovery for `jetpalette.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ColorMode, JetConfig, OutputFormat};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "jetpalette.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse jetpalette.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub format: Option<OutputFormat>,
    pub color: Option<ColorMode>,
}

/// Find jetpalette.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for jetpalette.toml
/// 2. Check XDG_CONFIG_HOME/jetpalette/jetpalette.toml (or ~/.config/jetpalette/jetpalette.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }
    find_xdg_config()
}

/// Find jetpalette.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("jetpalette").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find jetpalette.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] and falls back to [`default_config`] when nothing is found.
pub fn load_config(path: Option<&Path>) -> Result<JetConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<JetConfig, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let config: JetConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no jetpalette.toml is found.
pub fn default_config() -> JetConfig {
    JetConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut JetConfig, overrides: &CliOverrides) {
    if let Some(format) = overrides.format {
        config.output.format = format;
    }
    if let Some(color) = overrides.color {
        config.output.color = color;
    }
}
