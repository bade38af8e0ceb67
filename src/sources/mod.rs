//! Content sources with a trait-based architecture.
//!
//! Every source implements [`Source`]: search by keyword, return raw items.
//! Sources that discover communities (Reddit) also expose a [`SourceValidator`]
//! so the pipeline can drop inaccessible or restricted candidates before
//! collecting from them.
//!
//! # Sources
//!
//! - `reddit` - session-authenticated Reddit API; needs client id, client secret
//!   and user agent (`REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET`, `REDDIT_USER_AGENT`)
//! - `hackernews` - Hacker News search via the public Algolia endpoint; no credentials

mod hackernews;
pub mod mock;
mod reddit;
mod registry;

pub use hackernews::HackerNewsSource;
pub use mock::{MockResponse, MockSource};
pub use reddit::{is_valid_community_name, RedditSource};
pub use registry::{SourceCapabilities, SourceRegistry};

use crate::models::{RawItem, SearchQuery, SourceKind};
use async_trait::async_trait;

/// The Source trait defines the interface for all content sources.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Implement `id`, `name`, `kind`, and `search`
/// 3. If the source discovers communities, advertise `DISCOVERY | VALIDATION`
///    and return itself from `validator`
/// 4. Register it in `SourceRegistry::from_config`
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "reddit")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Which record shape this source produces
    fn kind(&self) -> SourceKind;

    /// Describe the capabilities of this source
    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SEARCH
    }

    /// Whether keyword searches surface communities worth collecting from
    fn supports_discovery(&self) -> bool {
        self.capabilities().contains(SourceCapabilities::DISCOVERY)
    }

    /// Eligibility check for discovered communities
    fn validator(&self) -> Option<&dyn SourceValidator> {
        None
    }

    /// Search for raw items matching the query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawItem>, SourceError>;
}

/// Decides whether a discovered community may be collected from.
///
/// Implementations are total: any failure while resolving the candidate
/// (missing, private, network error) answers `false`.
#[async_trait]
pub trait SourceValidator: Send + Sync {
    async fn is_eligible(&self, candidate: &str) -> bool;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Required credentials are blank
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The request timed out
    #[error("Request timed out")]
    Timeout,

    /// Non-success response from an API call
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Non-success response from a search endpoint; treated as "no data"
    #[error("Upstream unavailable (status {status})")]
    UpstreamUnavailable { status: u16 },

    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
