//! Installer configuration (TOML).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::io::files::write_atomic;

/// Settings for the commands the install strategies run.
///
/// Missing fields default to the values used by the published tool, so an
/// empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerConfig {
    /// Package manager executable used for installs and builds.
    pub npm_command: String,

    /// Git executable used for development installs.
    pub git_command: String,

    /// Repository cloned for development installs.
    pub repository: String,

    /// Forward package-manager output live instead of only on failure.
    pub stream_output: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            npm_command: "npm".to_string(),
            git_command: "git".to_string(),
            repository: "https://github.com/codeoverflow-org/nodecg-io.git".to_string(),
            stream_output: false,
        }
    }
}

impl InstallerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.npm_command.trim().is_empty() {
            return Err(anyhow!("npm_command must not be empty"));
        }
        if self.git_command.trim().is_empty() {
            return Err(anyhow!("git_command must not be empty"));
        }
        if self.repository.trim().is_empty() {
            return Err(anyhow!("repository must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `InstallerConfig::default()`.
pub fn load_config(path: &Path) -> Result<InstallerConfig> {
    if !path.exists() {
        return Ok(InstallerConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: InstallerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &InstallerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, buf).with_context(|| format!("write config {}", path.display()))
}
