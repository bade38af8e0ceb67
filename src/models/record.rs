//! Normalized record models produced by a collection run.

use serde::{Deserialize, Serialize};

/// Author placeholder for discussion comments whose account is absent or deleted.
pub const UNKNOWN_COMMENT_AUTHOR: &str = "Unknown";

/// Placeholder for news hits without a title.
pub const NO_TITLE: &str = "No Title Available";

/// Placeholder for news hits without a creation date.
pub const NO_DATE: &str = "No Date Available";

/// Placeholder for news hits without an author.
pub const UNKNOWN_NEWS_AUTHOR: &str = "Unknown Author";

/// Placeholder for news hits without a link.
pub const NO_URL: &str = "No URL Available";

/// The kind of upstream a run collects from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Reddit,
    HackerNews,
}

impl SourceKind {
    /// Returns the display name of the source
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Reddit => "Reddit",
            SourceKind::HackerNews => "Hacker News",
        }
    }

    /// Returns the source identifier
    pub fn id(&self) -> &'static str {
        match self {
            SourceKind::Reddit => "reddit",
            SourceKind::HackerNews => "hackernews",
        }
    }

    /// File name used when a result set of this kind is exported
    pub fn export_file_name(&self) -> &'static str {
        match self {
            SourceKind::Reddit => "reddit_posts_relevant.csv",
            SourceKind::HackerNews => "hacker_news_search_results.csv",
        }
    }

    /// MIME type advertised for the exported file
    pub fn export_mime_type(&self) -> &'static str {
        "text/csv"
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One comment under a Reddit submission, with the submission's fields repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionRecord {
    pub title: String,
    pub url: String,
    pub score: i64,
    /// Submission creation time, seconds since the Unix epoch (UTC)
    pub created: f64,
    pub subreddit: String,
    pub submission_content: String,
    pub comment: String,
    pub comment_author: String,
}

/// One Hacker News search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    #[serde(rename = "News Title")]
    pub title: String,

    /// Highlighted title text with emphasis markup removed
    #[serde(rename = "News Text")]
    pub text: String,

    #[serde(rename = "Story Date")]
    pub story_date: String,

    /// Matched words joined with ", "
    #[serde(rename = "Matched Keywords")]
    pub matched_keywords: String,

    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Author Name")]
    pub author: String,
}

/// A flat, sentinel-filled record ready for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Discussion(DiscussionRecord),
    News(NewsRecord),
}

impl NormalizedRecord {
    /// The source kind whose column set this record uses
    pub fn kind(&self) -> SourceKind {
        match self {
            NormalizedRecord::Discussion(_) => SourceKind::Reddit,
            NormalizedRecord::News(_) => SourceKind::HackerNews,
        }
    }
}

impl From<DiscussionRecord> for NormalizedRecord {
    fn from(record: DiscussionRecord) -> Self {
        NormalizedRecord::Discussion(record)
    }
}

impl From<NewsRecord> for NormalizedRecord {
    fn from(record: NewsRecord) -> Self {
        NormalizedRecord::News(record)
    }
}

/// All records gathered by one run, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub kind: SourceKind,
    pub records: Vec<NormalizedRecord>,
}

impl ResultSet {
    /// Create an empty result set for a run against `kind`
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Append records in the order they were produced
    pub fn extend(&mut self, records: impl IntoIterator<Item = NormalizedRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.records.iter()
    }
}
