//! Configuration file discovery.
//!
//! # Configuration File Format
//!
//! ```toml
//! [reddit]
//! client_id = "your-client-id"
//! user_agent = "keyword-harvester/0.1 by u/you"
//! discovery_limit = 10
//! collection_limit = 5
//!
//! [hackernews]
//! search_url = "https://hn.algolia.com/api/v1/search"
//!
//! [http]
//! timeout_secs = 30
//! max_attempts = 3
//!
//! [export]
//! directory = "./exports"
//! ```
//!
//! The client secret is never written by `init-config`; supply it through
//! `REDDIT_CLIENT_SECRET` or edit the file by hand.

use std::path::PathBuf;

/// File name looked up in the working directory
const LOCAL_CONFIG_NAME: &str = "keyword-harvester.toml";

/// Candidate config locations, most specific first
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("keyword-harvester").join("config.toml"));
    }
    paths
}

/// First existing config file among [`default_config_paths`]
pub fn find_config_file() -> Option<PathBuf> {
    default_config_paths().into_iter().find(|p| p.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
