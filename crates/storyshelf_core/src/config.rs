//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables fall back to defaults.
//! - Invalid values are rejected with the offending variable name.

use crate::document::DEFAULT_DOCUMENT_NAME;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_STORIES_PATH: &str = "STORYSHELF_STORIES_PATH";
pub const ENV_EXPORT_PATH: &str = "STORYSHELF_EXPORT_PATH";
pub const ENV_LOG_LEVEL: &str = "STORYSHELF_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STORYSHELF_LOG_DIR";
pub const ENV_TAG_SCOPE: &str = "STORYSHELF_TAG_SCOPE";

const EXPORT_DIR_NAME: &str = "export";
const LOG_DIR_NAME: &str = "storyshelf-logs";

/// Which stories feed the tag chip index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagScope {
    /// Whole collection, regardless of secret mode.
    #[default]
    Collection,
    /// Only the current visibility partition.
    Visible,
}

impl TagScope {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "collection" | "all" => Some(Self::Collection),
            "visible" => Some(Self::Visible),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                variable,
                value,
                expected,
            } => write!(f, "invalid {variable} `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfConfig {
    pub stories_path: PathBuf,
    pub export_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
    pub tag_scope: TagScope,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            stories_path: PathBuf::from(DEFAULT_DOCUMENT_NAME),
            export_path: PathBuf::from(EXPORT_DIR_NAME).join(DEFAULT_DOCUMENT_NAME),
            log_level: default_log_level(),
            log_dir: std::env::temp_dir().join(LOG_DIR_NAME),
            tag_scope: TagScope::default(),
        }
    }
}

impl ShelfConfig {
    /// Reads `STORYSHELF_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = read(ENV_STORIES_PATH) {
            config.stories_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_EXPORT_PATH) {
            config.export_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&value).map_err(|_| ConfigError::InvalidValue {
                variable: ENV_LOG_LEVEL,
                value: value.clone(),
                expected: "trace|debug|info|warn|error",
            })?;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            let path = PathBuf::from(&value);
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    variable: ENV_LOG_DIR,
                    value,
                    expected: "an absolute directory",
                });
            }
            config.log_dir = path;
        }
        if let Some(value) = read(ENV_TAG_SCOPE) {
            config.tag_scope = TagScope::parse(&value).ok_or_else(|| ConfigError::InvalidValue {
                variable: ENV_TAG_SCOPE,
                value: value.clone(),
                expected: "collection|visible",
            })?;
        }

        Ok(config)
    }
}
