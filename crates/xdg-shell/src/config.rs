//! Runtime configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowest `xdg_wm_base` version this client speaks
pub const MIN_VERSION: u32 = 1;

/// Highest `xdg_wm_base` version this client may be configured to bind
pub const MAX_VERSION: u32 = 6;

/// Shell client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Highest `xdg_wm_base` version to bind (default: 1)
    pub max_version: u32,

    /// Echo a minimize request back into the window's states right away.
    /// The compositor never confirms minimization, so this is a guess.
    pub reflect_minimized: bool,

    /// App id sent for new toplevels (demo client)
    pub app_id: Option<String>,

    /// Title sent for new toplevels (demo client)
    pub title: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_version: MIN_VERSION,
            reflect_minimized: true,
            app_id: None,
            title: None,
        }
    }
}

impl ShellConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("xdg-shell/config.toml")),
            Some(PathBuf::from("/etc/xdg-shell/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::from_path(&path) {
                Ok(config) => {
                    tracing::info!(?path, max_version = config.max_version, "loaded configuration");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "failed to load config");
                }
            }
        }

        tracing::info!("using default configuration");
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ShellConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_VERSION..=MAX_VERSION).contains(&self.max_version) {
            return Err(ConfigError::UnsupportedVersion(self.max_version));
        }
        Ok(())
    }

    /// Version to bind given what the compositor advertises
    pub fn bind_version(&self, advertised: u32) -> u32 {
        advertised.min(self.max_version)
    }
}

/// Helper for getting XDG directories
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}
