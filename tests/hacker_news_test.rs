//! HTTP client and end-to-end cache tests against a mock API server.

use std::sync::Arc;
use std::time::Duration;

use huginn::{
    HackerNewsClient, HackerNewsConfig, Huginn, HuginnError, NewsSource, RetryConfig,
    RetryingSource, StoryId,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HackerNewsClient {
    HackerNewsClient::with_config(
        HackerNewsConfig::with_base_url(format!("{}/v0", server.uri()))
            .item_page_prefix("https://hn.test/item?id="),
    )
    .unwrap()
}

fn item(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "by": format!("user{id}"),
        "title": format!("story {id}"),
        "type": "story",
        "url": format!("https://example.com/{id}"),
        "score": 10 + id,
        "time": 1_700_000_000u64 + id,
        "descendants": 4,
        "kids": [9001, 9002],
    })
}

async fn mount_item(server: &MockServer, id: u64, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(item(id)))
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn top_story_ids_preserves_rank() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([5, 3, 9, 1])))
        .expect(1)
        .mount(&server)
        .await;

    let ids = client(&server).top_story_ids().await.unwrap();
    assert_eq!(ids, vec![StoryId(5), StoryId(3), StoryId(9), StoryId(1)]);
}

#[tokio::test]
async fn story_decodes_wire_fields() {
    let server = MockServer::start().await;
    mount_item(&server, 42, 1).await;

    let story = client(&server).story(StoryId(42)).await.unwrap();
    assert_eq!(story.id, StoryId(42));
    assert_eq!(story.author, "user42");
    assert_eq!(story.title, "story 42");
    assert_eq!(story.kind, "story");
    assert_eq!(story.display_url, "https://example.com/42");
    assert_eq!(story.score, 52);
    assert_eq!(story.submitted_at, 1_700_000_042);
}

#[tokio::test]
async fn story_without_url_gets_item_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/8863.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8863,
            "by": "dhouston",
            "title": "Ask HN: My YC app",
            "type": "story",
        })))
        .mount(&server)
        .await;

    let story = client(&server).story(StoryId(8863)).await.unwrap();
    assert_eq!(story.display_url, "https://hn.test/item?id=8863");
    assert_eq!(story.score, 0);
}

#[tokio::test]
async fn item_without_id_takes_requested_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Ask HN: no id",
            "type": "story",
        })))
        .mount(&server)
        .await;

    let story = client(&server).story(StoryId(42)).await.unwrap();
    assert_eq!(story.id, StoryId(42));
    assert_eq!(story.display_url, "https://hn.test/item?id=42");
}

#[tokio::test]
async fn item_answering_for_another_id_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/42.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item(43)))
        .mount(&server)
        .await;

    let err = client(&server).story(StoryId(42)).await.unwrap_err();
    assert!(matches!(err, HuginnError::DataIntegrity(_)), "got {err:?}");
    assert!(err.to_string().contains("returned item 43 instead of 42"));
}

#[tokio::test]
async fn unknown_item_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/7.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let err = client(&server).story(StoryId(7)).await.unwrap_err();
    match err {
        HuginnError::Decode { url, message } => {
            assert!(url.ends_with("/v0/item/7.json"));
            assert_eq!(message, "item 7 does not exist");
        }
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).top_story_ids().await.unwrap_err();
    assert!(matches!(err, HuginnError::Decode { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).top_story_ids().await.unwrap_err();
    assert!(matches!(err, HuginnError::Api { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
        .mount(&server)
        .await;

    let err = client(&server).top_story_ids().await.unwrap_err();
    assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let client = HackerNewsClient::with_config(HackerNewsConfig::with_base_url(
        "http://127.0.0.1:1/v0",
    ))
    .unwrap();

    let err = client.top_story_ids().await.unwrap_err();
    assert!(matches!(err, HuginnError::Transport(_)));
}

// ============================================================================
// Retry over HTTP
// ============================================================================

#[tokio::test]
async fn retrying_source_recovers_from_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    let source = RetryingSource::new(
        Arc::new(client(&server)),
        RetryConfig::new().initial_delay(Duration::from_millis(1)),
    );
    let ids = source.top_story_ids().await.unwrap();
    assert_eq!(ids, vec![StoryId(1), StoryId(2)]);
}

#[tokio::test]
async fn retrying_source_does_not_retry_missing_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/item/7.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let source = RetryingSource::new(
        Arc::new(client(&server)),
        RetryConfig::new().initial_delay(Duration::from_millis(1)),
    );
    assert!(source.story(StoryId(7)).await.is_err());
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn built_cache_fetches_once_per_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/topstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([5, 3, 9, 1])))
        .expect(1)
        .mount(&server)
        .await;
    for id in [5, 3, 9] {
        mount_item(&server, id, 1).await;
    }
    mount_item(&server, 1, 0).await;

    let cache = Huginn::builder()
        .hacker_news(HackerNewsConfig::with_base_url(format!("{}/v0", server.uri())))
        .wanted(3)
        .no_refresh()
        .build()
        .unwrap();

    cache.fetch().await.unwrap();
    cache.fetch().await.unwrap();

    let titles: Vec<_> = cache
        .project()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, ["story 5", "story 3", "story 9"]);
}
