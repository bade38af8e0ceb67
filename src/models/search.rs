//! Search request models.

use serde::{Deserialize, Serialize};

/// Result cap for keyword discovery queries
pub const DISCOVERY_LIMIT: usize = 10;

/// Result cap for per-community collection queries
pub const COLLECTION_LIMIT: usize = 5;

/// Listing order requested from a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Relevance,
    Hot,
    New,
    Top,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Hot => "hot",
            SortBy::New => "new",
            SortBy::Top => "top",
        }
    }
}

/// Recency window for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Keyword to search for; may be empty for plain community listings
    pub query: String,

    /// Restrict to one community (`None` searches everywhere)
    pub community: Option<String>,

    pub sort_by: Option<SortBy>,

    pub time_filter: Option<TimeFilter>,

    /// Maximum number of items (`None` takes whatever the source pages back)
    pub max_results: Option<usize>,

    /// Whether to load and expand each submission's comments
    pub expand_comments: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            community: None,
            sort_by: None,
            time_filter: None,
            max_results: None,
            expand_comments: false,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Newest posts across all communities in the last hour
    pub fn discovery(keyword: impl Into<String>, limit: usize) -> Self {
        Self::new(keyword)
            .sort_by(SortBy::New)
            .time_filter(TimeFilter::Hour)
            .max_results(limit)
    }

    /// Newest posts in one community, with comments
    pub fn collection(community: impl Into<String>, limit: usize) -> Self {
        Self::default()
            .community(community)
            .sort_by(SortBy::New)
            .max_results(limit)
            .expand_comments(true)
    }

    pub fn community(mut self, community: impl Into<String>) -> Self {
        self.community = Some(community.into());
        self
    }

    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = Some(sort);
        self
    }

    pub fn time_filter(mut self, filter: TimeFilter) -> Self {
        self.time_filter = Some(filter);
        self
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn expand_comments(mut self, expand: bool) -> Self {
        self.expand_comments = expand;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_constraints() {
        let query = SearchQuery::discovery("genai", DISCOVERY_LIMIT);
        assert_eq!(query.query, "genai");
        assert_eq!(query.community, None);
        assert_eq!(query.sort_by, Some(SortBy::New));
        assert_eq!(query.time_filter, Some(TimeFilter::Hour));
        assert_eq!(query.max_results, Some(10));
        assert!(!query.expand_comments);
    }

    #[test]
    fn test_collection_constraints() {
        let query = SearchQuery::collection("rust", COLLECTION_LIMIT);
        assert!(query.query.is_empty());
        assert_eq!(query.community.as_deref(), Some("rust"));
        assert_eq!(query.sort_by, Some(SortBy::New));
        assert_eq!(query.time_filter, None);
        assert_eq!(query.max_results, Some(5));
        assert!(query.expand_comments);
    }

    #[test]
    fn test_plain_query_has_no_cap() {
        let query = SearchQuery::new("ai");
        assert_eq!(query.max_results, None);
        assert_eq!(query.sort_by.map(|s| s.as_str()), None);
        assert_eq!(TimeFilter::Hour.as_str(), "hour");
        assert_eq!(SortBy::New.as_str(), "new");
    }
}
