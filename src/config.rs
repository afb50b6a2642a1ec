//! Build configuration
//!
//! Loaded from a camelCase JSON file. Every section has defaults except
//! `outputPath`, which must be supplied by the file or a CLI override.

use crate::enrichment::EnrichmentSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Errors loading or validating a build configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No output path configured (set outputPath or pass --output)")]
    MissingOutputPath,

    #[error("enrichment.batchSize must be at least 1, got {0}")]
    InvalidBatchSize(usize),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which deterministic relationship phases run
///
/// The author builder has no toggle and always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipOptions {
    pub detect_links: bool,
    pub detect_tags: bool,
    pub detect_series: bool,
}

impl Default for RelationshipOptions {
    fn default() -> Self {
        Self {
            detect_links: true,
            detect_tags: true,
            detect_series: true,
        }
    }
}

/// Full build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Root directory that file patterns are resolved against
    pub content_path: PathBuf,
    /// Globs relative to `content_path`
    pub file_patterns: Vec<String>,
    /// Globs matched against discovered paths; matches are dropped
    pub exclude_patterns: Vec<String>,
    pub output_path: Option<PathBuf>,
    pub relationships: RelationshipOptions,
    pub enrichment: EnrichmentSettings,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from("content"),
            file_patterns: vec!["**/*.md".to_string(), "**/*.yml".to_string()],
            exclude_patterns: vec!["**/node_modules/**".to_string()],
            output_path: None,
            relationships: RelationshipOptions::default(),
            enrichment: EnrichmentSettings::default(),
        }
    }
}

impl BuildConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config file; a missing file is an error.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from an explicit path, or else the first default location that
    /// exists. With no file at all, defaults are used.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Using config {}", path.display());
                Self::from_file(&path)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply CLI overrides; `None` leaves the configured value.
    pub fn with_overrides(mut self, content: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(content) = content {
            self.content_path = content;
        }
        if let Some(output) = output {
            self.output_path = Some(output);
        }
        self
    }

    /// Check the fatal conditions, returning the output path on success.
    pub fn validate(&self) -> ConfigResult<&Path> {
        if self.enrichment.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(0));
        }
        self.output_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingOutputPath)
    }
}

/// `./config.json`, then `<user config dir>/kgraph/config.json`
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("kgraph").join(CONFIG_FILE_NAME));
    }
    paths
}
