//! Core data models for keywords, raw source items, and normalized records.

mod item;
mod keyword;
mod record;
mod search;

pub use item::{strip_emphasis, Comment, HitView, NewsHit, RawItem, Submission};
pub use keyword::{parse_keywords, split_keywords, Keyword, DEFAULT_KEYWORDS};
pub use record::{
    DiscussionRecord, NewsRecord, NormalizedRecord, ResultSet, SourceKind, NO_DATE, NO_TITLE,
    NO_URL, UNKNOWN_COMMENT_AUTHOR, UNKNOWN_NEWS_AUTHOR,
};
pub use search::{SearchQuery, SortBy, TimeFilter, COLLECTION_LIMIT, DISCOVERY_LIMIT};
