//! Configuration system for findyml.
//!
//! This module provides the configuration structure for findyml with sensible defaults
//! and support for serialization/deserialization via serde. Configuration is loaded
//! from a TOML file and command-line flags override it.
//!
//! # Example
//!
//! ```
//! use findyml::config::{Config, OutputFormat};
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.extensions, vec!["yml".to_string()]);
//! assert_eq!(config.format, OutputFormat::Text);
//!
//! // Create custom configuration
//! let custom = Config {
//!     extensions: vec!["yml".to_string(), "yaml".to_string()],
//!     ..Config::default()
//! };
//! ```

use crate::index::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How matches are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `file:line:col(alias-line)...`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Configuration for findyml.
///
/// All fields have sensible defaults via `Config::default()`, and any field
/// missing from the config file takes its default.
///
/// # Fields
///
/// * `extensions` - File extensions searched below the root (default: ["yml"])
/// * `show_alias_chain` - Print the lines of aliases traversed (default: true)
/// * `format` - Output format, "text" or "json" (default: "text")
/// * `max_depth` - Maximum nesting accepted before a file fails (default: 1024)
/// * `leaves_only` - Only report terminal nodes (default: false)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File extensions searched below the root
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Print the lines of aliases traversed to reach each hit
    #[serde(default = "default_show_alias_chain")]
    pub show_alias_chain: bool,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Maximum nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Only report terminal nodes
    #[serde(default)]
    pub leaves_only: bool,
}

/// Returns the default candidate extensions.
fn default_extensions() -> Vec<String> {
    vec!["yml".to_string()]
}

fn default_show_alias_chain() -> bool {
    true
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            show_alias_chain: default_show_alias_chain(),
            format: OutputFormat::default(),
            max_depth: default_max_depth(),
            leaves_only: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/findyml/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("findyml");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path` as pretty TOML.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
