//! Reddit source implementation.
//!
//! Uses the OAuth "application only" flow: the client id and secret are
//! exchanged for a bearer token, which is cached until shortly before it
//! expires. Every request carries the configured user agent, as Reddit's API
//! rules require.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::{Config, RedditCredentials};
use crate::models::{Comment, RawItem, SearchQuery, SortBy, SourceKind, Submission};
use crate::sources::{Source, SourceCapabilities, SourceError, SourceValidator};
use crate::utils::{with_retry, HttpClient};

/// Most comment ids `/api/morechildren` accepts per call
const MORECHILDREN_BATCH: usize = 100;

/// Refresh the token this long before Reddit says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Author name Reddit reports for removed accounts
const DELETED_AUTHOR: &str = "[deleted]";

/// Public Reddit host, used to absolutize permalinks
const REDDIT_WEB_BASE: &str = "https://www.reddit.com";

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Reddit source
///
/// Discovers subreddits from keyword searches, validates them through
/// `/r/{name}/about`, and collects the newest submissions with their full
/// comment trees.
pub struct RedditSource {
    http: HttpClient,
    credentials: RedditCredentials,
    auth_url: String,
    api_url: String,
    max_comment_expansions: usize,
    token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for RedditSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditSource")
            .field("credentials", &self.credentials)
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("max_comment_expansions", &self.max_comment_expansions)
            .finish_non_exhaustive()
    }
}

impl RedditSource {
    /// Create a Reddit source; fails if any credential is blank
    pub fn new(credentials: RedditCredentials, config: &Config) -> Result<Self, SourceError> {
        Self::check_credentials(&credentials)?;
        let http = HttpClient::from_config(&config.http, Some(&credentials.user_agent))?;

        Ok(Self {
            http,
            credentials,
            auth_url: config.reddit.auth_url.clone(),
            api_url: config.reddit.api_url.clone(),
            max_comment_expansions: config.reddit.max_comment_expansions,
            token: Mutex::new(None),
        })
    }

    /// Create against specific endpoints with an existing client
    pub fn with_client(
        credentials: RedditCredentials,
        http: HttpClient,
        auth_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, SourceError> {
        Self::check_credentials(&credentials)?;

        Ok(Self {
            http,
            credentials,
            auth_url: auth_url.into(),
            api_url: api_url.into(),
            max_comment_expansions: 32,
            token: Mutex::new(None),
        })
    }

    /// Limit the number of "load more comments" rounds per submission
    pub fn max_comment_expansions(mut self, rounds: usize) -> Self {
        self.max_comment_expansions = rounds;
        self
    }

    fn check_credentials(credentials: &RedditCredentials) -> Result<(), SourceError> {
        let missing = credentials.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SourceError::MissingCredentials(missing.join(", ")))
        }
    }

    async fn access_token(&self) -> Result<String, SourceError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, SourceError> {
        tracing::debug!("Requesting Reddit access token");

        let response = with_retry(self.http.retry_config(), || {
            let request = self
                .http
                .client()
                .post(&self.auth_url)
                .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
                .basic_auth(
                    &self.credentials.client_id,
                    Some(&self.credentials.client_secret),
                )
                .form(&[("grant_type", "client_credentials")]);
            async move {
                let response = request.send().await?;
                let status = response.status();
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    return Err(SourceError::Auth(format!(
                        "token endpoint returned status {}",
                        status
                    )));
                }
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(SourceError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Ok(response)
            }
        })
        .await?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse token response: {}", e)))?;

        match body.access_token {
            Some(value) if !value.is_empty() => {
                let lifetime = Duration::from_secs(body.expires_in.unwrap_or(3600));
                Ok(AccessToken {
                    value,
                    expires_at: Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN),
                })
            }
            _ => Err(SourceError::Auth(
                body.error
                    .unwrap_or_else(|| "no access token in response".to_string()),
            )),
        }
    }

    /// Authenticated GET against the API host
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), path);
        let token = self.access_token().await?;

        let response = with_retry(self.http.retry_config(), || {
            let request = self
                .http
                .client()
                .get(&url)
                .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
                .bearer_auth(&token)
                .query(params);
            async move {
                let response = request.send().await?;
                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(SourceError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Ok(response)
            }
        })
        .await?;

        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON from {}: {}", path, e)))
    }

    async fn list_submissions(&self, query: &SearchQuery) -> Result<Vec<Submission>, SourceError> {
        let sort = query.sort_by.unwrap_or(SortBy::New);

        let (path, mut params) = match query.community.as_deref() {
            Some(community) if query.query.is_empty() => {
                ensure_community_name(community)?;
                let listing = match sort {
                    SortBy::New => "new",
                    SortBy::Top => "top",
                    SortBy::Hot | SortBy::Relevance => "hot",
                };
                (format!("/r/{}/{}", community, listing), Vec::new())
            }
            community => {
                let scope = community.unwrap_or("all");
                ensure_community_name(scope)?;
                let mut params = vec![("q", query.query.clone()), ("sort", sort.as_str().to_string())];
                if community.is_some() {
                    params.push(("restrict_sr", "true".to_string()));
                }
                (format!("/r/{}/search", scope), params)
            }
        };

        if let Some(filter) = query.time_filter {
            params.push(("t", filter.as_str().to_string()));
        }
        if let Some(limit) = query.max_results {
            params.push(("limit", limit.to_string()));
        }
        params.push(("raw_json", "1".to_string()));

        let listing: Listing<ApiSubmission> = self.get_json(&path, &params).await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t3")
            .map(|thing| thing.data.into_submission())
            .collect())
    }

    /// Full comment list for a submission, "load more" stubs expanded
    async fn load_comments(&self, submission_id: &str) -> Result<Vec<Comment>, SourceError> {
        let path = format!("/comments/{}", submission_id);
        let listings: Vec<Value> = self
            .get_json(&path, &[("raw_json", "1".to_string())])
            .await?;

        let children = comment_listing(&listings).ok_or_else(|| {
            SourceError::Parse(format!("No comment listing for submission {}", submission_id))
        })?;

        let mut forest = CommentForest::default();
        forest.walk(children);
        self.expand_stubs(submission_id, &mut forest).await?;
        Ok(forest.comments)
    }

    /// Resolve "more" stubs until none remain or the round limit is hit.
    ///
    /// Stubs listing child ids go through `/api/morechildren`; empty
    /// "continue this thread" stubs are fetched as a subtree of their parent.
    async fn expand_stubs(
        &self,
        submission_id: &str,
        forest: &mut CommentForest,
    ) -> Result<(), SourceError> {
        let mut rounds = 0;

        while forest.has_stubs() {
            if rounds >= self.max_comment_expansions {
                tracing::warn!(
                    submission = submission_id,
                    unexpanded = forest.more.len(),
                    threads = forest.threads.len(),
                    "Comment expansion limit reached, remaining comments skipped"
                );
                break;
            }
            rounds += 1;

            if !forest.more.is_empty() {
                let take = forest.more.len().min(MORECHILDREN_BATCH);
                let batch: Vec<String> = forest.more.drain(..take).collect();
                let params = [
                    ("api_type", "json".to_string()),
                    ("link_id", format!("t3_{}", submission_id)),
                    ("children", batch.join(",")),
                    ("raw_json", "1".to_string()),
                ];

                let response: Value = self.get_json("/api/morechildren", &params).await?;
                let things = response
                    .pointer("/json/data/things")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                forest.walk(things);
            } else if let Some(parent) = forest.threads.pop_front() {
                let path = format!("/comments/{}/_/{}", submission_id, parent);
                let listings: Vec<Value> = self
                    .get_json(&path, &[("raw_json", "1".to_string())])
                    .await?;

                let replies = comment_listing(&listings)
                    .into_iter()
                    .flatten()
                    .find(|thing| thing.pointer("/data/id").and_then(Value::as_str) == Some(parent.as_str()))
                    .and_then(|thing| thing.pointer("/data/replies/data/children"))
                    .and_then(Value::as_array);

                match replies {
                    Some(replies) => forest.walk(replies),
                    None => tracing::debug!(
                        submission = submission_id,
                        parent = %parent,
                        "Continued thread had no replies"
                    ),
                }
            }
        }

        Ok(())
    }

    async fn about(&self, community: &str) -> Result<Thing<AboutData>, SourceError> {
        ensure_community_name(community)?;
        let path = format!("/r/{}/about", community);
        self.get_json(&path, &[("raw_json", "1".to_string())]).await
    }
}

#[async_trait]
impl Source for RedditSource {
    fn id(&self) -> &str {
        "reddit"
    }

    fn name(&self) -> &str {
        "Reddit"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Reddit
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::SEARCH | SourceCapabilities::DISCOVERY | SourceCapabilities::VALIDATION
    }

    fn validator(&self) -> Option<&dyn SourceValidator> {
        Some(self)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawItem>, SourceError> {
        let mut submissions = self.list_submissions(query).await?;

        if query.expand_comments {
            for submission in &mut submissions {
                submission.comments = self.load_comments(&submission.id).await?;
            }
        }

        Ok(submissions.into_iter().map(RawItem::Submission).collect())
    }
}

#[async_trait]
impl SourceValidator for RedditSource {
    async fn is_eligible(&self, candidate: &str) -> bool {
        match self.about(candidate).await {
            Ok(thing) => {
                let exists = thing.kind == "t5"
                    && thing
                        .data
                        .display_name
                        .as_deref()
                        .is_some_and(|name| !name.is_empty());
                let restricted = thing.data.over18.unwrap_or(false);
                if !exists || restricted {
                    tracing::debug!(candidate, exists, restricted, "Subreddit ineligible");
                }
                exists && !restricted
            }
            Err(e) => {
                tracing::debug!(candidate, error = %e, "Subreddit could not be resolved");
                false
            }
        }
    }
}

/// Subreddit names are ASCII letters, digits, and underscores, at most 21 long.
///
/// Profile subreddits (`u_<username>`) allow a full 20-character username.
pub fn is_valid_community_name(name: &str) -> bool {
    let max_len = if name.starts_with("u_") { 22 } else { 21 };
    !name.is_empty()
        && name.len() <= max_len
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn ensure_community_name(name: &str) -> Result<(), SourceError> {
    if is_valid_community_name(name) {
        Ok(())
    } else {
        Err(SourceError::InvalidRequest(format!(
            "Invalid subreddit name: {:?}",
            name
        )))
    }
}

/// Children of the comment listing in a `/comments/...` response
fn comment_listing(listings: &[Value]) -> Option<&Vec<Value>> {
    listings
        .get(1)
        .and_then(|listing| listing.pointer("/data/children"))
        .and_then(Value::as_array)
}

/// Comments gathered so far plus the stubs still to expand
#[derive(Debug, Default)]
struct CommentForest {
    comments: Vec<Comment>,
    /// Comment ids listed by "more" stubs
    more: VecDeque<String>,
    /// Parent comment ids of "continue this thread" stubs
    threads: VecDeque<String>,
}

impl CommentForest {
    fn has_stubs(&self) -> bool {
        !self.more.is_empty() || !self.threads.is_empty()
    }

    /// Walk a comment forest breadth-first, appending comments in visit order.
    fn walk(&mut self, children: &[Value]) {
        let mut queue: VecDeque<&Value> = children.iter().collect();

        while let Some(thing) = queue.pop_front() {
            match thing.get("kind").and_then(Value::as_str) {
                Some("t1") => {
                    let data = &thing["data"];
                    let body = data.get("body").and_then(Value::as_str).unwrap_or_default();
                    let author = data
                        .get("author")
                        .and_then(Value::as_str)
                        .filter(|a| *a != DELETED_AUTHOR);
                    self.comments.push(Comment::new(body, author));

                    if let Some(replies) = data
                        .pointer("/replies/data/children")
                        .and_then(Value::as_array)
                    {
                        queue.extend(replies.iter());
                    }
                }
                Some("more") => {
                    let ids: Vec<&str> = thing
                        .pointer("/data/children")
                        .and_then(Value::as_array)
                        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
                        .unwrap_or_default();

                    if !ids.is_empty() {
                        self.more.extend(ids.into_iter().map(str::to_string));
                    } else if let Some(parent) = thing
                        .pointer("/data/parent_id")
                        .and_then(Value::as_str)
                        .and_then(|p| p.strip_prefix("t1_"))
                    {
                        self.threads.push_back(parent.to_string());
                    }
                }
                _ => {}
            }
        }
    }
}

// ===== Reddit API Types =====

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    kind: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct ApiSubmission {
    id: String,
    #[serde(default)]
    title: String,
    url: Option<String>,
    permalink: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    selftext: String,
}

impl ApiSubmission {
    fn into_submission(self) -> Submission {
        let url = self
            .url
            .filter(|u| !u.is_empty())
            .or_else(|| self.permalink.map(|p| format!("{}{}", REDDIT_WEB_BASE, p)))
            .unwrap_or_default();

        Submission {
            id: self.id,
            title: self.title,
            url,
            score: self.score,
            created_utc: self.created_utc,
            subreddit: self.subreddit,
            selftext: self.selftext,
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AboutData {
    display_name: Option<String>,
    over18: Option<bool>,
}
