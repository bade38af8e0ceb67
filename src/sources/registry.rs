//! Registry for managing content sources.

use std::collections::HashMap;
use std::sync::Arc;

use super::{HackerNewsSource, RedditSource, Source, SourceError};
use crate::config::Config;
use crate::models::SourceKind;

bitflags::bitflags! {
    /// Capabilities that a source can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u32 {
        const SEARCH = 1 << 0;
        const DISCOVERY = 1 << 1;
        const VALIDATION = 1 << 2;
    }
}

impl SourceCapabilities {
    /// Lowercase names of the set flags
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(SourceCapabilities::SEARCH) {
            names.push("search");
        }
        if self.contains(SourceCapabilities::DISCOVERY) {
            names.push("discovery");
        }
        if self.contains(SourceCapabilities::VALIDATION) {
            names.push("validation");
        }
        names
    }
}

/// Registry for all available sources
///
/// Sources that could not be built because credentials are missing are
/// remembered, so asking for them reports the missing fields instead of
/// "not found".
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn Source>>,
    unavailable: HashMap<String, String>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every source the configuration allows
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let mut registry = Self::new();

        registry.register(Arc::new(HackerNewsSource::new(config)?));

        match RedditSource::new(config.reddit.credentials(), config) {
            Ok(reddit) => registry.register(Arc::new(reddit)),
            Err(SourceError::MissingCredentials(fields)) => {
                tracing::debug!("Reddit source unavailable, missing: {}", fields);
                registry
                    .unavailable
                    .insert(SourceKind::Reddit.id().to_string(), fields);
            }
            Err(e) => return Err(e),
        }

        Ok(registry)
    }

    /// Register a new source
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.unavailable.remove(source.id());
        self.sources.insert(source.id().to_string(), source);
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.get(id)
    }

    /// Get a source by ID, explaining why it is absent
    pub fn get_required(&self, id: &str) -> Result<&Arc<dyn Source>, SourceError> {
        if let Some(source) = self.get(id) {
            return Ok(source);
        }
        match self.unavailable.get(id) {
            Some(fields) => Err(SourceError::MissingCredentials(fields.clone())),
            None => Err(SourceError::InvalidRequest(format!(
                "Source '{}' not found",
                id
            ))),
        }
    }

    /// Get all registered sources
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.values()
    }

    /// Missing credential fields for a source that could not be registered
    pub fn unavailable_reason(&self, id: &str) -> Option<&str> {
        self.unavailable.get(id).map(|s| s.as_str())
    }

    /// Get sources that support a specific capability
    pub fn with_capability(&self, capability: SourceCapabilities) -> Vec<&Arc<dyn Source>> {
        self.all()
            .filter(|s| s.capabilities().contains(capability))
            .collect()
    }

    /// Check if a source exists
    pub fn has(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
