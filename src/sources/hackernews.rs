//! Hacker News source, backed by the Algolia search API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{NewsHit, RawItem, SearchQuery, SourceKind};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::{with_retry, HttpClient};

/// Hacker News search source
///
/// Stateless: one GET per keyword, no credentials.
#[derive(Debug, Clone)]
pub struct HackerNewsSource {
    http: HttpClient,
    search_url: String,
}

impl HackerNewsSource {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        Ok(Self {
            http: HttpClient::from_config(&config.http, None)?,
            search_url: config.hackernews.search_url.clone(),
        })
    }

    /// Create against a specific endpoint with an existing client
    pub fn with_client(http: HttpClient, search_url: impl Into<String>) -> Self {
        Self {
            http,
            search_url: search_url.into(),
        }
    }

    fn build_url(&self, query: &SearchQuery) -> String {
        let separator = if self.search_url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}query={}",
            self.search_url,
            separator,
            urlencoding::encode(&query.query)
        );
        if let Some(max) = query.max_results {
            url = format!("{}&hitsPerPage={}", url, max);
        }
        url
    }
}

#[async_trait]
impl Source for HackerNewsSource {
    fn id(&self) -> &str {
        "hackernews"
    }

    fn name(&self) -> &str {
        "Hacker News"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::HackerNews
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SEARCH
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawItem>, SourceError> {
        let url = self.build_url(query);

        let response = with_retry(self.http.retry_config(), || {
            let request = self.http.client().get(&url);
            async move {
                let response = request.send().await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::UpstreamUnavailable {
                        status: status.as_u16(),
                    });
                }
                Ok(response)
            }
        })
        .await?;

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        tracing::debug!(
            keyword = %query.query,
            hits = data.hits.len(),
            "Hacker News search returned"
        );

        Ok(data
            .hits
            .into_iter()
            .map(|hit| RawItem::NewsHit(NewsHit(hit)))
            .collect())
    }
}

// ===== Algolia API Types =====

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<serde_json::Value>,
}
