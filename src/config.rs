/// Configuration system for commit-index
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::ConfigError;
use crate::parser::accumulator::{BOUNDARY_MERGE_MARKER, FINAL_MERGE_MARKER};
use crate::parser::ticket::DEFAULT_PROJECT_CODE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Log export parsing configuration
    #[serde(default)]
    pub parser: ParserConfig,

    /// Import run behaviour
    #[serde(default)]
    pub run: RunConfig,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one Tantivy index per collection
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Collection that receives commit documents
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// Parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Issue tracker project code for ticket extraction (e.g. "SI" for SI-123)
    #[serde(default = "default_ticket_project")]
    pub ticket_project: String,

    /// Message prefix that marks a merge commit when a new revision starts
    #[serde(default = "default_boundary_merge_marker")]
    pub boundary_merge_marker: String,

    /// Message prefix that marks a merge commit for the last block of the file
    #[serde(default = "default_final_merge_marker")]
    pub final_merge_marker: String,

    /// Extra chrono date formats tried after the built-in ones
    #[serde(default)]
    pub date_formats: Vec<String>,
}

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Ask for confirmation that message line breaks were removed before importing
    #[serde(default = "default_confirm_sanitized")]
    pub confirm_sanitized: bool,
}

fn default_index_path() -> PathBuf {
    crate::paths::PlatformPaths::default_index_path()
}

fn default_collection() -> String {
    "git-commit".to_string()
}

fn default_ticket_project() -> String {
    DEFAULT_PROJECT_CODE.to_string()
}

fn default_boundary_merge_marker() -> String {
    BOUNDARY_MERGE_MARKER.to_string()
}

fn default_final_merge_marker() -> String {
    FINAL_MERGE_MARKER.to_string()
}

fn default_confirm_sanitized() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            collection: default_collection(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            ticket_project: default_ticket_project(),
            boundary_merge_marker: default_boundary_merge_marker(),
            final_merge_marker: default_final_merge_marker(),
            date_formats: Vec::new(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            confirm_sanitized: default_confirm_sanitized(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or create default
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_collection_name(&self.store.collection) {
            return Err(ConfigError::InvalidValue {
                key: "store.collection".to_string(),
                reason: format!(
                    "must be non-empty and contain only letters, digits, '-' or '_', got '{}'",
                    self.store.collection
                ),
            });
        }

        let project = &self.parser.ticket_project;
        if project.is_empty() || !project.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue {
                key: "parser.ticket_project".to_string(),
                reason: format!("must be a non-empty alphanumeric code, got '{}'", project),
            });
        }

        if self.parser.boundary_merge_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "parser.boundary_merge_marker".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.parser.final_merge_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "parser.final_merge_marker".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("COMMIT_INDEX_INDEX_PATH") {
            self.store.index_path = PathBuf::from(path);
        }

        if let Ok(collection) = std::env::var("COMMIT_INDEX_COLLECTION") {
            self.store.collection = collection;
        }

        if let Ok(project) = std::env::var("COMMIT_INDEX_TICKET_PROJECT") {
            self.parser.ticket_project = project;
        }
    }

    /// Load from `path` (or the default location), then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

/// Collection names become directory names, so keep them to a safe alphabet
pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
