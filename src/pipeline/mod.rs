//! Keyword-driven collection runs.
//!
//! A run goes through fixed stages:
//!
//! 1. Parse the comma-separated keyword input
//! 2. Discover candidate communities (sources with `DISCOVERY` only)
//! 3. Keep the candidates the source's validator accepts
//! 4. Collect from each community, or from each keyword for plain search sources
//! 5. Extract flat records and aggregate them in processing order
//!
//! A failure in one collection unit is logged, kept as a warning, and does not
//! stop the run. Rejected credentials end the run as a configuration error.
//! Stages run strictly in sequence.

pub mod extract;

pub use extract::{extract, extract_news_hit, extract_submission};

use std::collections::HashSet;

use crate::config::Config;
use crate::models::{
    parse_keywords, Keyword, NormalizedRecord, ResultSet, SearchQuery, COLLECTION_LIMIT,
    DISCOVERY_LIMIT,
};
use crate::sources::{Source, SourceError};

/// Errors that end a run without output
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("no keywords given")]
    NoKeywords,

    #[error("no valid sources found")]
    NoValidSources,

    #[error("no relevant results")]
    EmptyResult,
}

/// A collection unit that failed; the run went on without it
#[derive(Debug, thiserror::Error)]
#[error("Error collecting from {origin}: {error}")]
pub struct SourceCollectionError {
    /// Community or keyword the unit was collecting
    pub origin: String,
    #[source]
    pub error: SourceError,
}

/// Everything a successful run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub result_set: ResultSet,
    pub warnings: Vec<SourceCollectionError>,
    /// Communities or keywords collected from, in order
    pub sources: Vec<String>,
}

/// Orchestrates one run against one source
#[derive(Debug, Clone, Copy)]
pub struct CollectionPipeline {
    discovery_limit: usize,
    collection_limit: usize,
}

impl Default for CollectionPipeline {
    fn default() -> Self {
        Self {
            discovery_limit: DISCOVERY_LIMIT,
            collection_limit: COLLECTION_LIMIT,
        }
    }
}

impl CollectionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            discovery_limit: config.reddit.discovery_limit,
            collection_limit: config.reddit.collection_limit,
        }
    }

    /// Run the pipeline for a raw keyword string
    pub async fn run(
        &self,
        source: &dyn Source,
        keyword_input: &str,
    ) -> Result<RunOutcome, PipelineError> {
        let keywords = parse_keywords(keyword_input);
        if keywords.is_empty() {
            return Err(PipelineError::NoKeywords);
        }
        tracing::info!(
            source = source.id(),
            keywords = keywords.len(),
            "Starting collection run"
        );

        let mut warnings = Vec::new();
        let units = if source.supports_discovery() {
            let candidates = self.discover(source, &keywords, &mut warnings).await?;
            let validated = self.validate(source, candidates).await?;
            if validated.is_empty() {
                return Err(PipelineError::NoValidSources);
            }
            validated
                .into_iter()
                .map(|community| {
                    let query = SearchQuery::collection(community.clone(), self.collection_limit);
                    (community, query)
                })
                .collect::<Vec<_>>()
        } else {
            keywords
                .iter()
                .map(|keyword| (keyword.to_string(), SearchQuery::new(keyword.as_str())))
                .collect()
        };

        let mut result_set = ResultSet::new(source.kind());
        let mut sources = Vec::with_capacity(units.len());

        for (label, query) in units {
            match collect_unit(source, &label, &query).await {
                Ok(records) => {
                    tracing::debug!(unit = %label, records = records.len(), "Collected");
                    result_set.extend(records);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    warnings.push(e);
                }
            }
            sources.push(label);
        }

        if result_set.is_empty() {
            return Err(PipelineError::EmptyResult);
        }

        tracing::info!(
            records = result_set.len(),
            warnings = warnings.len(),
            "Collection run finished"
        );

        Ok(RunOutcome {
            result_set,
            warnings,
            sources,
        })
    }

    /// Communities surfaced by the keyword searches, first-seen order, no duplicates
    async fn discover(
        &self,
        source: &dyn Source,
        keywords: &[Keyword],
        warnings: &mut Vec<SourceCollectionError>,
    ) -> Result<Vec<String>, PipelineError> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for keyword in keywords {
            let query = SearchQuery::discovery(keyword.as_str(), self.discovery_limit);
            match source.search(&query).await {
                Ok(items) => {
                    for community in items.iter().filter_map(|item| item.community()) {
                        if seen.insert(community.to_string()) {
                            candidates.push(community.to_string());
                        }
                    }
                }
                Err(SourceError::Auth(reason)) => {
                    return Err(PipelineError::Configuration(format!(
                        "{} rejected the credentials: {}",
                        source.name(),
                        reason
                    )));
                }
                Err(error) => {
                    let e = SourceCollectionError {
                        origin: keyword.to_string(),
                        error,
                    };
                    tracing::warn!("Discovery failed: {}", e);
                    warnings.push(e);
                }
            }
        }

        tracing::info!(candidates = candidates.len(), "Discovery finished");
        Ok(candidates)
    }

    async fn validate(
        &self,
        source: &dyn Source,
        candidates: Vec<String>,
    ) -> Result<Vec<String>, PipelineError> {
        let validator = source.validator().ok_or_else(|| {
            PipelineError::Configuration(format!(
                "source '{}' discovers communities but has no validator",
                source.id()
            ))
        })?;

        let mut validated = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if validator.is_eligible(&candidate).await {
                validated.push(candidate);
            }
        }

        tracing::info!(valid = validated.len(), "Validation finished");
        Ok(validated)
    }
}

async fn collect_unit(
    source: &dyn Source,
    label: &str,
    query: &SearchQuery,
) -> Result<Vec<NormalizedRecord>, SourceCollectionError> {
    let items = source
        .search(query)
        .await
        .map_err(|error| SourceCollectionError {
            origin: label.to_string(),
            error,
        })?;

    Ok(items.iter().flat_map(extract).collect())
}
