//! Configuration handling for starkdocs.
//!
//! Configuration is read from `config.toml` in the XDG config directory
//! (override with `STARKDOCS_CONFIG_DIR`) or from an explicit `--config` path.
//! A missing default file means defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use starkdocs_core::{Error, Result, SplitOptions};
use std::path::{Path, PathBuf};
use tracing::Level;

const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Splitter options
    #[serde(default)]
    pub chunking: SplitOptions,

    /// Where documents are published
    #[serde(default)]
    pub sources: SourceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source documentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    /// Public root of the rendered docs, used to build source links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level.
    pub fn tracing_level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|_| Error::Config(format!("unknown log level '{}'", self.level)))
    }
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => match Self::config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the chunking options.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        Ok(())
    }

    /// Path of the default config file.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// A commented sample config file.
    pub fn sample_toml() -> &'static str {
        r#"# starkdocs configuration

[chunking]
# Upper bound for a chunk before overlap, in characters
max_chars = 2048
# Chunks shorter than this are merged with a neighbor
min_chars = 500
# Characters of context copied from the previous chunk
overlap = 256
# Header levels that start a new section
header_levels = [1, 2]
# Never split inside fenced code blocks
preserve_code_blocks = true
# Prepended to every chunk id
id_prefix = ""
trim = true

[sources]
# Public docs root used to build source links
# base_url = "https://book.cairo-lang.org"

[logging]
level = "info"
"#
    }
}

/// Get the XDG config directory for starkdocs.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("STARKDOCS_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "starkdocs").map(|dirs| dirs.config_dir().to_path_buf())
}
