//! # Keyword Harvester
//!
//! Collects discussion content matching a set of keywords from Reddit and
//! Hacker News, and exports it as flat CSV records.
//!
//! ## Architecture
//!
//! - [`models`]: Keywords, search queries, raw items, and normalized records
//! - [`sources`]: The `Source` trait and its Reddit and Hacker News implementations
//! - [`pipeline`]: Discovery, validation, collection, and extraction for one run
//! - [`export`]: CSV writer and reader for result sets
//! - [`utils`]: HTTP client and retry helpers
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal output helpers for the binary

pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use export::ExportSink;
pub use models::{NormalizedRecord, ResultSet, SourceKind};
pub use pipeline::{CollectionPipeline, PipelineError, RunOutcome};
pub use sources::{Source, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
