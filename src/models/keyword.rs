//! Keyword parsing.

use serde::{Deserialize, Serialize};

/// Keywords used when none are given
pub const DEFAULT_KEYWORDS: &str =
    "customer service automation, GenAI in contact center, customer service, generative ai";

/// A non-empty, trimmed search keyword
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyword(String);

impl Keyword {
    /// Trim `raw`; returns `None` if nothing is left
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Keyword {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Keyword::new(&value).ok_or_else(|| "keyword must not be blank".to_string())
    }
}

impl From<Keyword> for String {
    fn from(keyword: Keyword) -> Self {
        keyword.0
    }
}

/// Split on commas without trimming or filtering.
///
/// Always yields one segment more than the number of commas.
pub fn split_keywords(input: &str) -> Vec<&str> {
    input.split(',').collect()
}

/// Split on commas, trim each segment, and drop blank ones.
///
/// Order and duplicates are preserved.
pub fn parse_keywords(input: &str) -> Vec<Keyword> {
    split_keywords(input)
        .into_iter()
        .filter_map(Keyword::new)
        .collect()
}
