//! Configuration management.

mod file_config;

pub use file_config::{default_config_paths, find_config_file, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{COLLECTION_LIMIT, DISCOVERY_LIMIT};

/// Default Reddit OAuth token endpoint
pub const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Default Reddit API host for authenticated calls
pub const REDDIT_API_URL: &str = "https://oauth.reddit.com";

/// Default Hacker News search endpoint
pub const HACKERNEWS_SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reddit: RedditConfig,

    #[serde(default)]
    pub hackernews: HackerNewsConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Check that every configured endpoint is an absolute URL
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        for (name, value) in [
            ("reddit.auth_url", &self.reddit.auth_url),
            ("reddit.api_url", &self.reddit.api_url),
            ("hackernews.search_url", &self.hackernews.search_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigFileError::Invalid(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
            }
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// The credential triple Reddit requires for an application-only session
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Names of the fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.trim().is_empty() {
            missing.push("client_id");
        }
        if self.client_secret.trim().is_empty() {
            missing.push("client_secret");
        }
        if self.user_agent.trim().is_empty() {
            missing.push("user_agent");
        }
        missing
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Reddit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    #[serde(default = "env_client_id")]
    pub client_id: Option<String>,

    #[serde(default = "env_client_secret", skip_serializing)]
    pub client_secret: Option<String>,

    #[serde(default = "env_user_agent")]
    pub user_agent: Option<String>,

    #[serde(default = "default_reddit_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_reddit_api_url")]
    pub api_url: String,

    /// Posts inspected per keyword while discovering subreddits
    #[serde(default = "default_discovery_limit")]
    pub discovery_limit: usize,

    /// Newest posts collected per validated subreddit
    #[serde(default = "default_collection_limit")]
    pub collection_limit: usize,

    /// Upper bound on "load more comments" rounds per submission
    #[serde(default = "default_max_comment_expansions")]
    pub max_comment_expansions: usize,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: env_client_id(),
            client_secret: env_client_secret(),
            user_agent: env_user_agent(),
            auth_url: default_reddit_auth_url(),
            api_url: default_reddit_api_url(),
            discovery_limit: default_discovery_limit(),
            collection_limit: default_collection_limit(),
            max_comment_expansions: default_max_comment_expansions(),
        }
    }
}

impl RedditConfig {
    /// Credentials as configured, blanks included
    pub fn credentials(&self) -> RedditCredentials {
        RedditCredentials::new(
            self.client_id.clone().unwrap_or_default(),
            self.client_secret.clone().unwrap_or_default(),
            self.user_agent.clone().unwrap_or_default(),
        )
    }
}

fn env_client_id() -> Option<String> {
    std::env::var("REDDIT_CLIENT_ID").ok()
}

fn env_client_secret() -> Option<String> {
    std::env::var("REDDIT_CLIENT_SECRET").ok()
}

fn env_user_agent() -> Option<String> {
    std::env::var("REDDIT_USER_AGENT").ok()
}

fn default_reddit_auth_url() -> String {
    REDDIT_AUTH_URL.to_string()
}

fn default_reddit_api_url() -> String {
    REDDIT_API_URL.to_string()
}

fn default_discovery_limit() -> usize {
    DISCOVERY_LIMIT
}

fn default_collection_limit() -> usize {
    COLLECTION_LIMIT
}

fn default_max_comment_expansions() -> usize {
    32
}

/// Hacker News settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackerNewsConfig {
    #[serde(default = "default_hackernews_search_url")]
    pub search_url: String,
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            search_url: default_hackernews_search_url(),
        }
    }
}

fn default_hackernews_search_url() -> String {
    HACKERNEWS_SEARCH_URL.to_string()
}

/// HTTP client settings shared by both sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Attempts per request, first try included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    500
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory that receives the CSV file
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("KEYWORD_HARVESTER")
        .prefix_separator("__")
        .separator("__")
}

/// Load configuration from a file, with `KEYWORD_HARVESTER__SECTION__KEY` overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Defaults plus `KEYWORD_HARVESTER__SECTION__KEY` overrides, for runs without a file
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}
