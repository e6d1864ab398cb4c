//! Configuration file support for Drydock.
//!
//! Drydock supports two configuration file locations:
//! - Global: `~/.drydock/preprocessor.toml` - User-wide defaults
//! - Project: `.drydock/preprocessor.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Preprocessor configuration for tool overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Preprocessor settings
    pub preprocessor: PreprocessorSettings,
}

/// Preprocessor tool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorSettings {
    /// Path to the preprocessor driver (e.g., /usr/bin/clang)
    pub path: Option<PathBuf>,

    /// Additional compiler options passed on every invocation
    #[serde(default)]
    pub options: Vec<String>,
}

impl PreprocessorConfig {
    /// Load preprocessor configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preprocessor config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse preprocessor config: {}", path.display()))
    }

    /// Load preprocessor configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load preprocessor config from {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Check if any preprocessor settings are configured.
    pub fn has_overrides(&self) -> bool {
        self.preprocessor.path.is_some() || !self.preprocessor.options.is_empty()
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: PreprocessorConfig) {
        if other.preprocessor.path.is_some() {
            self.preprocessor.path = other.preprocessor.path;
        }
        if !other.preprocessor.options.is_empty() {
            self.preprocessor.options = other.preprocessor.options;
        }
    }
}

/// Path to the project preprocessor config (`.drydock/preprocessor.toml`).
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".drydock").join("preprocessor.toml")
}

/// Path to the global preprocessor config (`~/.drydock/preprocessor.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".drydock/preprocessor.toml"))
}

/// Load merged preprocessor configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.drydock/preprocessor.toml)
/// 2. Global config (~/.drydock/preprocessor.toml)
/// 3. Defaults
pub fn load_preprocessor_config(global_path: &Path, project_path: &Path) -> PreprocessorConfig {
    let mut config = PreprocessorConfig::default();

    if global_path.exists() {
        config.merge(PreprocessorConfig::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(PreprocessorConfig::load_or_default(project_path));
    }

    config
}
