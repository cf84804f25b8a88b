// Tests for store-backed crawling against a mock wiki

use std::time::Duration;
use tempfile::TempDir;
use wikiscraper_core::crawl::{CrawlOptions, execute_crawl};
use wikiscraper_core::{CoreError, FrequencyStore};
use wikiscraper_scanner::{Phrase, ScanError, ScraperConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article(text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#" <a href="/wiki/{}">{}</a>"#, l, l.replace('_', " ")))
        .collect();
    format!(
        r#"<html><body><div id="mw-content-text"><div class="mw-parser-output"><p>{}{}</p></div></div></body></html>"#,
        text, anchors
    )
}

async fn mount(server: &MockServer, title: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/wiki/{}", title)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> ScraperConfig {
    ScraperConfig::default()
        .with_base_url(server.uri())
        .with_retries(0, Duration::from_millis(1))
}

fn options(start: &str, max_depth: usize, store_path: std::path::PathBuf) -> CrawlOptions {
    CrawlOptions {
        start: Phrase::new(start),
        max_depth,
        delay: Duration::ZERO,
        store_path,
        show_progress: false,
    }
}

// ============================================================================
// Breadth-first crawl
// ============================================================================

#[tokio::test]
async fn test_crawl_visits_each_article_once_in_bfs_order() {
    let server = MockServer::start().await;
    mount(&server, "Start", article("rocket", &["Alpha", "Beta", "Alpha"])).await;
    mount(&server, "Alpha", article("rocket team", &["Beta", "Gamma", "Start"])).await;
    mount(&server, "Beta", article("team", &["Start"])).await;
    mount(&server, "Gamma", article("never reached", &[])).await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("counts.json");
    let summary = execute_crawl(config(&server), options("Start", 1, store_path.clone()))
        .await
        .unwrap();

    assert_eq!(summary.report.phrases(), vec!["Start", "Alpha", "Beta"]);
    assert_eq!(summary.report.max_depth_reached(), 1);

    let store = FrequencyStore::load(&store_path).unwrap();
    assert_eq!(store.get("rocket"), Some(2));
    assert_eq!(store.get("team"), Some(2));
    assert_eq!(store.get("never"), None);
    assert_eq!(summary.distinct_words, store.len());
}

#[tokio::test]
async fn test_crawl_depth_two_reaches_grandchildren() {
    let server = MockServer::start().await;
    mount(&server, "Start", article("one", &["Alpha"])).await;
    mount(&server, "Alpha", article("two", &["Gamma"])).await;
    mount(&server, "Gamma", article("three", &["Delta"])).await;

    let dir = TempDir::new().unwrap();
    let summary = execute_crawl(config(&server), options("Start", 2, dir.path().join("c.json")))
        .await
        .unwrap();

    assert_eq!(summary.report.phrases(), vec!["Start", "Alpha", "Gamma"]);
    assert_eq!(summary.report.pages_processed(), 3);
}

#[tokio::test]
async fn test_crawl_adds_to_existing_store() {
    let server = MockServer::start().await;
    mount(&server, "Start", article("rocket", &[])).await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("counts.json");
    std::fs::write(&store_path, "{\"rocket\": 3, \"zubat\": 1}").unwrap();

    execute_crawl(config(&server), options("Start", 0, store_path.clone()))
        .await
        .unwrap();

    let store = FrequencyStore::load(&store_path).unwrap();
    assert_eq!(store.get("rocket"), Some(4));
    assert_eq!(store.get("zubat"), Some(1));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_failed_fetch_aborts_but_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount(&server, "Start", article("rocket", &["Missing", "Beta"])).await;
    mount(&server, "Beta", article("gengar", &[])).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("counts.json");
    let err = execute_crawl(config(&server), options("Start", 1, store_path.clone()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::Scan(ScanError::FetchStatus { status: 404, .. })
    ));
    let store = FrequencyStore::load(&store_path).unwrap();
    assert_eq!(store.get("rocket"), Some(1));
    assert_eq!(store.get("gengar"), None);
}

#[tokio::test]
async fn test_malformed_store_fails_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article("x", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("counts.json");
    std::fs::write(&store_path, "[1, 2, 3]").unwrap();

    let err = execute_crawl(config(&server), options("Start", 1, store_path))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Format { .. }));
}

#[tokio::test]
async fn test_empty_start_phrase_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = execute_crawl(
        ScraperConfig::default(),
        options("   ", 1, dir.path().join("c.json")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}
