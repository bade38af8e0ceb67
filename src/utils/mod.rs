//! Utility modules supporting collection runs.
//!
//! - [`HttpClient`]: reqwest client with per-call timeouts and a retry policy
//! - [`RetryConfig`]: bounded retry with exponential backoff
//! - [`with_retry`]: execute an operation, retrying transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use keyword_harvester::sources::SourceError;
//! use keyword_harvester::utils::{with_retry, RetryConfig};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = RetryConfig::default();
//! let data = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{with_retry, RetryConfig, TransientError};
