//! Configuration loading, validation, and management for kbscope.
//!
//! Loads configuration from `~/.kbscope/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source kinds understood by [`KnowledgeConfig::source`].
pub const SOURCE_KINDS: &[&str] = &["file", "sqlite", "none"];

/// The root configuration structure.
///
/// Maps directly to `~/.kbscope/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the knowledge corpus comes from
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Filtering, ranking and truncation settings
    #[serde(default)]
    pub scoping: ScopingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// "file", "sqlite" or "none"
    #[serde(default = "default_source")]
    pub source: String,

    /// Path to the JSONL/JSON file or SQLite database.
    /// SQLite falls back to `~/.kbscope/knowledge.sqlite` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_source() -> String {
    "sqlite".into()
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            path: None,
        }
    }
}

impl KnowledgeConfig {
    /// The effective storage path for the configured source, if any.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match (self.source.as_str(), &self.path) {
            (_, Some(path)) => Some(PathBuf::from(path)),
            ("sqlite", None) => Some(AppConfig::config_dir().join("knowledge.sqlite")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopingConfig {
    /// Maximum number of rows rendered into the context block
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Maximum number of history messages kept (most recent)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Content types that earn the type-preference bonus
    #[serde(default = "default_preferred_types")]
    pub preferred_types: Vec<String>,
}

fn default_max_rows() -> usize {
    8
}
fn default_history_limit() -> usize {
    6
}
fn default_preferred_types() -> Vec<String> {
    vec![
        "project_summary".into(),
        "summary".into(),
        "outcome".into(),
        "method".into(),
    ]
}

impl Default for ScopingConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            history_limit: default_history_limit(),
            preferred_types: default_preferred_types(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.kbscope/config.toml).
    ///
    /// Environment variables override file values:
    /// - `KBSCOPE_SOURCE`
    /// - `KBSCOPE_KNOWLEDGE_PATH`
    /// - `KBSCOPE_MAX_ROWS`
    /// - `KBSCOPE_HISTORY_LIMIT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a specific file path.
    ///
    /// Only parses; call [`AppConfig::validate`] once overrides are applied,
    /// since the environment may complete what the file leaves out.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("KBSCOPE_SOURCE") {
            self.knowledge.source = source;
        }

        if let Some(path) = lookup("KBSCOPE_KNOWLEDGE_PATH") {
            self.knowledge.path = Some(path);
        }

        if let Some(raw) = lookup("KBSCOPE_MAX_ROWS") {
            self.scoping.max_rows = parse_count("KBSCOPE_MAX_ROWS", &raw)?;
        }

        if let Some(raw) = lookup("KBSCOPE_HISTORY_LIMIT") {
            self.scoping.history_limit = parse_count("KBSCOPE_HISTORY_LIMIT", &raw)?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".kbscope")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SOURCE_KINDS.contains(&self.knowledge.source.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "knowledge.source must be one of {}, got '{}'",
                SOURCE_KINDS.join(", "),
                self.knowledge.source
            )));
        }

        if self.knowledge.source == "file" && self.knowledge.path.is_none() {
            return Err(ConfigError::ValidationError(
                "knowledge.path is required when knowledge.source = \"file\"".into(),
            ));
        }

        if self.scoping.max_rows == 0 {
            return Err(ConfigError::ValidationError(
                "scoping.max_rows must be > 0".into(),
            ));
        }

        if self.scoping.history_limit == 0 {
            return Err(ConfigError::ValidationError(
                "scoping.history_limit must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parse_count(key: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse().map_err(|_| {
        ConfigError::ValidationError(format!("{key} must be a positive integer, got '{raw}'"))
    })
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
