//! Integration tests for Keyword Harvester
//!
//! These run full collection runs against local mock HTTP servers and check
//! the exported CSV files.

use keyword_harvester::config::{load_config, Config, HttpConfig, RedditCredentials};
use keyword_harvester::export::{read_csv, ExportSink};
use keyword_harvester::models::{NormalizedRecord, SourceKind};
use keyword_harvester::pipeline::{CollectionPipeline, PipelineError};
use keyword_harvester::sources::{HackerNewsSource, RedditSource, Source, SourceRegistry};
use keyword_harvester::utils::HttpClient;
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

fn test_http() -> HttpClient {
    let config = HttpConfig {
        max_attempts: 1,
        ..Default::default()
    };
    HttpClient::from_config(&config, Some("keyword-harvester-tests/0.1")).unwrap()
}

fn reddit_source(server: &mockito::Server) -> RedditSource {
    RedditSource::with_client(
        RedditCredentials::new("id", "secret", "keyword-harvester-tests/0.1"),
        test_http(),
        format!("{}/api/v1/access_token", server.url()),
        server.url(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_hackernews_run_and_export() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::UrlEncoded(
            "query".into(),
            "GenAI in contact center".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "hits": [
                {
                    "title": "GenAI in the contact center",
                    "created_at": "2024-05-01T12:00:00Z",
                    "url": "https://example.com/story",
                    "author": "pg",
                    "_highlightResult": { "title": {
                        "value": "<em>GenAI</em> in the <em>contact center</em>",
                        "matchedWords": ["genai", "contact", "center"]
                    }}
                },
                { "title": "Ask HN: support bots?", "url": null }
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/api/v1/search")
        .match_query(Matcher::UrlEncoded("query".into(), "ai".into()))
        .with_status(404)
        .create_async()
        .await;

    let source = HackerNewsSource::with_client(test_http(), format!("{}/api/v1/search", server.url()));
    let outcome = CollectionPipeline::new()
        .run(&source, "ai, GenAI in contact center")
        .await
        .unwrap();

    assert_eq!(outcome.result_set.len(), 2);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].origin, "ai");

    let dir = TempDir::new().unwrap();
    let exported = ExportSink::new(dir.path()).export(&outcome.result_set).unwrap();
    assert_eq!(exported.file_name, "hacker_news_search_results.csv");
    assert_eq!(exported.mime_type, "text/csv");

    let read = read_csv(&exported.path, SourceKind::HackerNews).unwrap();
    assert_eq!(read, outcome.result_set);
    match &read.records[0] {
        NormalizedRecord::News(record) => {
            assert_eq!(record.text, "GenAI in the contact center");
            assert_eq!(record.matched_keywords, "genai, contact, center");
        }
        other => panic!("unexpected record {:?}", other),
    }
    match &read.records[1] {
        NormalizedRecord::News(record) => {
            assert_eq!(record.url, "No URL Available");
            assert_eq!(record.author, "Unknown Author");
            assert_eq!(record.matched_keywords, "");
        }
        other => panic!("unexpected record {:?}", other),
    }
}

#[tokio::test]
async fn test_reddit_run_and_export() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("POST", "/api/v1/access_token")
        .with_status(200)
        .with_body(r#"{"access_token":"tok","token_type":"bearer","expires_in":3600}"#)
        .create_async()
        .await;
    let _search = server
        .mock("GET", "/r/all/search")
        .match_query(Matcher::UrlEncoded("q".into(), "genai".into()))
        .with_status(200)
        .with_body(
            json!({ "kind": "Listing", "data": { "children": [
                { "kind": "t3", "data": { "id": "d1", "subreddit": "genai" } },
                { "kind": "t3", "data": { "id": "d2", "subreddit": "adult_ai" } },
                { "kind": "t3", "data": { "id": "d3", "subreddit": "genai" } }
            ]}})
            .to_string(),
        )
        .create_async()
        .await;
    let _about_ok = server
        .mock("GET", "/r/genai/about")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"kind":"t5","data":{"display_name":"genai","over18":false}}"#)
        .create_async()
        .await;
    let _about_adult = server
        .mock("GET", "/r/adult_ai/about")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"kind":"t5","data":{"display_name":"adult_ai","over18":true}}"#)
        .create_async()
        .await;
    let adult_listing = server
        .mock("GET", "/r/adult_ai/new")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let _listing = server
        .mock("GET", "/r/genai/new")
        .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
        .with_status(200)
        .with_body(
            json!({ "kind": "Listing", "data": { "children": [
                { "kind": "t3", "data": {
                    "id": "p1", "title": "Agents for support", "url": "https://example.com/p1",
                    "score": 7, "created_utc": 1700000000.0, "subreddit": "genai",
                    "selftext": "Anyone shipping these?"
                } }
            ]}})
            .to_string(),
        )
        .create_async()
        .await;
    let _comments = server
        .mock("GET", "/comments/p1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([
                { "kind": "Listing", "data": { "children": [] } },
                { "kind": "Listing", "data": { "children": [
                    { "kind": "t1", "data": { "body": "We are", "author": "alice", "replies": "" } },
                    { "kind": "t1", "data": { "body": "Not yet", "author": "[deleted]", "replies": "" } }
                ]}}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let source = reddit_source(&server);
    assert!(source.supports_discovery());

    let outcome = CollectionPipeline::new().run(&source, "genai").await.unwrap();
    adult_listing.assert_async().await;

    assert_eq!(outcome.sources, vec!["genai"]);
    assert_eq!(outcome.result_set.len(), 2);

    let dir = TempDir::new().unwrap();
    let exported = ExportSink::new(dir.path()).export(&outcome.result_set).unwrap();
    assert_eq!(exported.file_name, "reddit_posts_relevant.csv");

    let read = read_csv(&exported.path, SourceKind::Reddit).unwrap();
    assert_eq!(read, outcome.result_set);
    match &read.records[1] {
        NormalizedRecord::Discussion(record) => {
            assert_eq!(record.title, "Agents for support");
            assert_eq!(record.score, 7);
            assert_eq!(record.comment, "Not yet");
            assert_eq!(record.comment_author, "Unknown");
        }
        other => panic!("unexpected record {:?}", other),
    }
}

#[tokio::test]
async fn test_reddit_run_without_valid_sources() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("POST", "/api/v1/access_token")
        .with_status(200)
        .with_body(r#"{"access_token":"tok","expires_in":3600}"#)
        .create_async()
        .await;
    let _search = server
        .mock("GET", "/r/all/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({ "kind": "Listing", "data": { "children": [
                { "kind": "t3", "data": { "id": "d1", "subreddit": "private_one" } }
            ]}})
            .to_string(),
        )
        .create_async()
        .await;
    let _about = server
        .mock("GET", "/r/private_one/about")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let result = CollectionPipeline::new()
        .run(&reddit_source(&server), "genai")
        .await;
    assert!(matches!(result, Err(PipelineError::NoValidSources)));
}

#[tokio::test]
async fn test_reddit_run_with_rejected_credentials() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("POST", "/api/v1/access_token")
        .with_status(401)
        .create_async()
        .await;
    let search = server
        .mock("GET", "/r/all/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = CollectionPipeline::new()
        .run(&reddit_source(&server), "genai, rust")
        .await;

    search.assert_async().await;
    assert!(matches!(result, Err(PipelineError::Configuration(_))));
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keyword-harvester.toml");

    let mut config = Config::default();
    config.reddit.client_id = Some("from-file".to_string());
    config.reddit.client_secret = Some("never-written".to_string());
    config.http.max_attempts = 5;
    config.export.directory = dir.path().join("exports");
    config.save(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("never-written"));

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.reddit.client_id.as_deref(), Some("from-file"));
    assert_eq!(loaded.http.max_attempts, 5);
    assert_eq!(loaded.export.directory, dir.path().join("exports"));
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_registry_lists_both_kinds() {
    let mut config = Config::default();
    config.reddit.client_id = Some("id".to_string());
    config.reddit.client_secret = Some("secret".to_string());
    config.reddit.user_agent = Some("ua".to_string());

    let registry = SourceRegistry::from_config(&config).unwrap();
    for kind in [SourceKind::Reddit, SourceKind::HackerNews] {
        let source = registry.get_required(kind.id()).unwrap();
        assert_eq!(source.kind(), kind);
    }
}
