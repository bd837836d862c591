//! Configuration for the grbridge MCP server.
//!
//! Configuration is loaded from `~/.config/grbridge/server.toml`; every
//! field has a default, so a missing file is fine.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use grbridge_core::ExecutorConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the grbridge MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Server name (shown to MCP clients).
    #[serde(default = "default_name")]
    pub name: String,

    /// Server version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Interpreter program used to run commands.
    #[serde(default = "default_rscript")]
    pub rscript: String,

    /// Scratch directory for transient script/output files. Defaults to
    /// `.rbridge-temp` under the working directory.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Optional per-command timeout in milliseconds. Absent means wait
    /// unboundedly for the interpreter.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Development mode: ANSI log output on stderr. Quiet otherwise.
    #[serde(default)]
    pub development: bool,
}

fn default_name() -> String {
    "grbridge".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_rscript() -> String {
    "Rscript".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            rscript: default_rscript(),
            scratch_dir: None,
            timeout_ms: None,
            development: false,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the default config file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "grbridge")
            .context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("server.toml"))
    }

    /// Derive the executor configuration for the bridge.
    pub fn executor_config(&self) -> ExecutorConfig {
        let defaults = ExecutorConfig::default();
        ExecutorConfig {
            rscript: self.rscript.clone(),
            scratch_dir: self.scratch_dir.clone().unwrap_or(defaults.scratch_dir),
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}
