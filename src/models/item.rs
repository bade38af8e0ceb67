//! Raw items returned by a source before normalization.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::record::{NO_DATE, NO_TITLE, NO_URL, UNKNOWN_NEWS_AUTHOR};

/// A Reddit comment, reduced to the fields a record needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,

    /// `None` when the account is gone
    pub author: Option<String>,
}

impl Comment {
    pub fn new(body: impl Into<String>, author: Option<&str>) -> Self {
        Self {
            body: body.into(),
            author: author.map(str::to_string),
        }
    }
}

/// A Reddit submission with its fully flattened comment list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub created_utc: f64,
    pub subreddit: String,
    pub selftext: String,

    /// Breadth-first order, expanded stubs appended last
    pub comments: Vec<Comment>,
}

/// One hit from the news search endpoint, kept as raw JSON.
///
/// Fields are read through [`HitView`], which substitutes a fixed placeholder
/// whenever a key is missing, null, or of an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsHit(pub serde_json::Value);

impl NewsHit {
    pub fn view(&self) -> HitView<'_> {
        HitView { raw: &self.0 }
    }
}

/// Read-only accessor over a news hit.
#[derive(Debug, Clone, Copy)]
pub struct HitView<'a> {
    raw: &'a serde_json::Value,
}

impl<'a> HitView<'a> {
    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.raw.get(key).and_then(|v| v.as_str())
    }

    fn title_highlight(&self) -> Option<&'a serde_json::Value> {
        self.raw.get("_highlightResult").and_then(|h| h.get("title"))
    }

    pub fn title(&self) -> String {
        self.str_field("title").unwrap_or(NO_TITLE).to_string()
    }

    pub fn story_date(&self) -> String {
        self.str_field("created_at").unwrap_or(NO_DATE).to_string()
    }

    pub fn author(&self) -> String {
        self.str_field("author")
            .unwrap_or(UNKNOWN_NEWS_AUTHOR)
            .to_string()
    }

    pub fn url(&self) -> String {
        self.str_field("url").unwrap_or(NO_URL).to_string()
    }

    /// Words the search engine matched in the title; empty when absent
    pub fn matched_words(&self) -> Vec<&'a str> {
        self.title_highlight()
            .and_then(|t| t.get("matchedWords"))
            .and_then(|w| w.as_array())
            .map(|words| words.iter().filter_map(|w| w.as_str()).collect())
            .unwrap_or_default()
    }

    /// Highlighted title with `<em>` markup removed; empty when absent
    pub fn highlighted_text(&self) -> String {
        self.title_highlight()
            .and_then(|t| t.get("value"))
            .and_then(|v| v.as_str())
            .map(strip_emphasis)
            .unwrap_or_default()
    }
}

/// Remove `<em>` and `</em>` tags, leaving the enclosed text.
pub fn strip_emphasis(text: &str) -> String {
    static EMPHASIS: OnceLock<Regex> = OnceLock::new();
    let re = EMPHASIS.get_or_init(|| Regex::new(r"</?em>").expect("static regex"));
    re.replace_all(text, "").into_owned()
}

/// A source-specific payload, discarded once extracted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawItem {
    Submission(Submission),
    NewsHit(NewsHit),
}

impl RawItem {
    /// Community the item was posted in, if the source has communities
    pub fn community(&self) -> Option<&str> {
        match self {
            RawItem::Submission(s) => Some(&s.subreddit),
            RawItem::NewsHit(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(
            strip_emphasis("Why <em>GenAI</em> in the <em>contact center</em>"),
            "Why GenAI in the contact center"
        );
        assert_eq!(strip_emphasis("plain"), "plain");
        assert_eq!(strip_emphasis("<b>kept</b>"), "<b>kept</b>");
    }

    #[test]
    fn test_hit_view_full() {
        let hit = NewsHit(json!({
            "title": "Show HN: GenAI agent",
            "created_at": "2024-09-01T10:00:00Z",
            "author": "pg",
            "url": "https://example.com/agent",
            "_highlightResult": {
                "title": {
                    "value": "Show HN: <em>GenAI</em> agent",
                    "matchedWords": ["genai"]
                }
            }
        }));
        let view = hit.view();

        assert_eq!(view.title(), "Show HN: GenAI agent");
        assert_eq!(view.story_date(), "2024-09-01T10:00:00Z");
        assert_eq!(view.author(), "pg");
        assert_eq!(view.url(), "https://example.com/agent");
        assert_eq!(view.matched_words(), vec!["genai"]);
        assert_eq!(view.highlighted_text(), "Show HN: GenAI agent");
    }

    #[test]
    fn test_hit_view_missing_and_null_fields() {
        let hit = NewsHit(json!({ "url": null, "author": 42 }));
        let view = hit.view();

        assert_eq!(view.title(), NO_TITLE);
        assert_eq!(view.story_date(), NO_DATE);
        assert_eq!(view.author(), UNKNOWN_NEWS_AUTHOR);
        assert_eq!(view.url(), NO_URL);
        assert!(view.matched_words().is_empty());
        assert_eq!(view.highlighted_text(), "");
    }

    #[test]
    fn test_hit_view_malformed_highlight() {
        let hit = NewsHit(json!({
            "_highlightResult": { "title": "not an object" }
        }));
        assert!(hit.view().matched_words().is_empty());
        assert_eq!(hit.view().highlighted_text(), "");

        let hit = NewsHit(json!({
            "_highlightResult": { "title": { "matchedWords": "genai", "value": 7 } }
        }));
        assert!(hit.view().matched_words().is_empty());
        assert_eq!(hit.view().highlighted_text(), "");
    }
}
