//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::{Comment, NewsHit, RawItem, SearchQuery, SourceKind, Submission};
use crate::sources::{Source, SourceCapabilities, SourceError, SourceValidator};

/// What a mock search answers for one key
#[derive(Debug, Clone)]
pub enum MockResponse {
    Items(Vec<RawItem>),
    Fail(String),
    Status(u16),
    /// Credentials refused
    Reject(String),
}

/// A mock source that returns predefined responses.
///
/// Responses are keyed by `r/{community}` for community listings and by the
/// raw query text otherwise. Unknown keys answer an empty list. Eligibility
/// is closed-world: candidates never marked eligible are rejected.
#[derive(Debug)]
pub struct MockSource {
    kind: SourceKind,
    responses: Mutex<HashMap<String, MockResponse>>,
    eligibility: Mutex<HashMap<String, bool>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source producing items of `kind`.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            responses: Mutex::new(HashMap::new()),
            eligibility: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the response for a query or `r/{community}` key.
    pub fn set_response(&self, key: impl Into<String>, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), response);
    }

    /// Mark a community as eligible or not.
    pub fn set_eligible(&self, community: impl Into<String>, eligible: bool) {
        self.eligibility
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(community.into(), eligible);
    }

    /// Keys searched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn key_for(query: &SearchQuery) -> String {
        match &query.community {
            Some(community) => format!("r/{}", community),
            None => query.query.clone(),
        }
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        self.kind.id()
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn capabilities(&self) -> SourceCapabilities {
        match self.kind {
            SourceKind::Reddit => {
                SourceCapabilities::SEARCH
                    | SourceCapabilities::DISCOVERY
                    | SourceCapabilities::VALIDATION
            }
            SourceKind::HackerNews => SourceCapabilities::SEARCH,
        }
    }

    fn validator(&self) -> Option<&dyn SourceValidator> {
        match self.kind {
            SourceKind::Reddit => Some(self),
            SourceKind::HackerNews => None,
        }
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawItem>, SourceError> {
        let key = Self::key_for(query);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key.clone());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        match response {
            Some(MockResponse::Items(items)) => Ok(items),
            Some(MockResponse::Fail(message)) => Err(SourceError::Network(message)),
            Some(MockResponse::Status(status)) => Err(SourceError::UpstreamUnavailable { status }),
            Some(MockResponse::Reject(reason)) => Err(SourceError::Auth(reason)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl SourceValidator for MockSource {
    async fn is_eligible(&self, candidate: &str) -> bool {
        self.eligibility
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(candidate)
            .copied()
            .unwrap_or(false)
    }
}

/// Helper to create a submission item for testing.
pub fn make_submission(id: &str, subreddit: &str, comments: &[(&str, Option<&str>)]) -> RawItem {
    RawItem::Submission(Submission {
        id: id.to_string(),
        title: format!("Post {}", id),
        url: format!("https://www.reddit.com/r/{}/comments/{}/", subreddit, id),
        score: 1,
        created_utc: 1_700_000_000.0,
        subreddit: subreddit.to_string(),
        selftext: String::new(),
        comments: comments
            .iter()
            .map(|(body, author)| Comment::new(*body, *author))
            .collect(),
    })
}

/// Helper to create a news hit item for testing.
pub fn make_hit(hit: serde_json::Value) -> RawItem {
    RawItem::NewsHit(NewsHit(hit))
}
