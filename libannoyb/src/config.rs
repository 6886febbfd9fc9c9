//! Configuration management for annoyb
//!
//! The configuration is a single JSON document holding the Twitter API
//! credentials, the `tweet` template settings and an optional `log` section.
//! It is loaded once at startup and passed by reference afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Default configuration file name, resolved next to the executable
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default Twitter API endpoint
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub twitter_consumer_key: String,
    #[serde(default)]
    pub twitter_consumer_secret: String,
    #[serde(default)]
    pub twitter_access_token: String,
    #[serde(default)]
    pub twitter_access_token_secret: String,

    /// Base URL of the API (overridable for testing against a local server)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    pub tweet: TweetConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Template settings for the composed message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetConfig {
    /// Template with `{name}` placeholders
    pub format: String,
    #[serde(default)]
    pub hashtag: String,
    /// Recipient handles, without the leading "@"
    #[serde(default)]
    pub target: Vec<String>,
    #[serde(default = "default_target_delimiter")]
    pub target_delimiter: String,
    /// Any further fields are made available to the template
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Append log output to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl LogConfig {
    /// The log file path with `~` expanded, if one is configured
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file
            .as_ref()
            .map(|path| PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string()))
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_target_delimiter() -> String {
    " ".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Ensure the consumer credentials are present
    ///
    /// Access tokens may still be empty; that is the first-run case handled
    /// by the authorization bootstrap.
    pub fn validate(&self) -> Result<()> {
        if self.twitter_consumer_key.trim().is_empty()
            || self.twitter_consumer_secret.trim().is_empty()
        {
            return Err(ConfigError::MissingField(
                "twitter_consumer_key/twitter_consumer_secret".to_string(),
            )
            .into());
        }

        if self.tweet.format.is_empty() {
            return Err(ConfigError::MissingField("tweet.format".to_string()).into());
        }

        if let Some(handle) = self.tweet.target.iter().find(|h| h.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "tweet.target".to_string(),
                reason: format!("empty handle {:?}", handle),
            }
            .into());
        }

        Ok(())
    }

    /// Whether both access token fields are set
    pub fn has_access_token(&self) -> bool {
        !self.twitter_access_token.trim().is_empty()
            && !self.twitter_access_token_secret.trim().is_empty()
    }
}

/// Resolve the configuration file path
///
/// An explicit path wins, then `ANNOYB_CONFIG`, then `config.json` next to
/// the running executable.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("ANNOYB_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let exe = std::env::current_exe().map_err(ConfigError::ReadError)?;
    let dir = exe
        .parent()
        .ok_or_else(|| ConfigError::MissingField("executable directory".to_string()))?;

    Ok(dir.join(DEFAULT_CONFIG_FILE))
}
