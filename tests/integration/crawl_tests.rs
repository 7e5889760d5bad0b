//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small article graph and test
//! the full crawl cycle end-to-end.

use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;
use wiki_trawler::config::Config;
use wiki_trawler::crawler::Coordinator;
use wiki_trawler::storage::{read_index, IndexRecord};
use wiki_trawler::CrawlPhase;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server with no delays
fn create_test_config(base_url: &str, out_dir: &Path, limit: u32, depth: u32, workers: u32) -> Config {
    let mut config = Config::for_topic("A");
    config.site.base_url = base_url.to_string();
    config.crawler.page_limit = limit;
    config.crawler.max_depth = depth;
    config.crawler.workers = workers;
    config.politeness.base_delay_seconds = 0.0;
    config.politeness.jitter_seconds = 0.0;
    config.politeness.request_timeout_seconds = 5.0;
    config.politeness.max_retries = 2;
    config.output.directory = Some(out_dir.to_path_buf());
    config
}

fn article_html(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="/wiki/{l}">{l}</a> "#))
        .collect();

    format!(
        r#"<html><head><title>{title} - Test Wiki</title></head><body>
        <h1 id="firstHeading">{title}</h1>
        <div class="mw-parser-output">
          <p>{title} is an article.[1]</p>
          <p>See also: {anchors}</p>
        </div>
        </body></html>"#
    )
}

/// Serves an article at `/wiki/<topic>` that must be requested `times` times
async fn mount_article(server: &MockServer, topic: &str, links: &[&str], times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/wiki/{}", topic)))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html(topic, links)))
        .expect(times)
        .mount(server)
        .await;
}

async fn run_crawl(config: &Config) -> (wiki_trawler::CrawlReport, Vec<IndexRecord>) {
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");
    assert_eq!(coordinator.phase(), CrawlPhase::Done);

    let rows = read_index(&report.index_path).expect("Failed to read index");
    (report, rows)
}

fn topic_of(row: &IndexRecord) -> &str {
    row.url.rsplit('/').next().unwrap_or("")
}

#[tokio::test]
async fn test_budget_stops_breadth_first_crawl() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_article(&server, "A", &["B", "C", "D"], 1).await;
    mount_article(&server, "B", &[], 1).await;
    mount_article(&server, "C", &[], 1).await;
    mount_article(&server, "D", &[], 0).await;

    let config = create_test_config(&server.uri(), out.path(), 3, 1, 1);
    let (report, rows) = run_crawl(&config).await;

    assert_eq!(report.saved, 3);
    assert_eq!(report.failed, 0);

    let topics: Vec<_> = rows.iter().map(topic_of).collect();
    assert_eq!(topics, vec!["A", "B", "C"]);
    assert_eq!(rows[0].depth, 0);
    assert_eq!(rows[1].depth, 1);
    assert_eq!(rows[2].depth, 1);
    assert_eq!(rows[0].out_links, 3);

    for row in &rows {
        assert_eq!(row.status, "200");
        assert!(out.path().join(&row.file).exists());
    }

    let text = std::fs::read_to_string(out.path().join("A.txt")).unwrap();
    assert!(text.starts_with("A is an article."));
    assert!(!text.contains("[1]"));
}

#[tokio::test]
async fn test_pages_reachable_twice_are_fetched_once() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_article(&server, "A", &["B", "C"], 1).await;
    mount_article(&server, "B", &["C", "A"], 1).await;
    mount_article(&server, "C", &["B", "A"], 1).await;

    let config = create_test_config(&server.uri(), out.path(), 10, 3, 2);
    let (report, rows) = run_crawl(&config).await;

    assert_eq!(report.saved, 3);
    assert_eq!(rows.len(), 3);

    let unique: HashSet<_> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(unique.len(), rows.len());
}

#[tokio::test]
async fn test_depth_bound_is_respected() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_article(&server, "A", &["B"], 1).await;
    mount_article(&server, "B", &["C"], 1).await;
    mount_article(&server, "C", &[], 0).await;

    let config = create_test_config(&server.uri(), out.path(), 10, 1, 2);
    let (_, rows) = run_crawl(&config).await;

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.depth <= 1));
}

#[tokio::test]
async fn test_zero_depth_fetches_only_seed() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_article(&server, "A", &["B"], 1).await;
    mount_article(&server, "B", &[], 0).await;

    let config = create_test_config(&server.uri(), out.path(), 10, 0, 4);
    let (report, rows) = run_crawl(&config).await;

    assert_eq!(report.saved, 1);
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_budget_respected_with_many_workers() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let children = ["B", "C", "D", "E", "F", "G", "H", "I", "J", "K"];
    mount_article(&server, "A", &children, 1).await;
    for child in children {
        Mock::given(method("GET"))
            .and(path(format!("/wiki/{}", child)))
            .respond_with(ResponseTemplate::new(200).set_body_string(article_html(child, &[])))
            .mount(&server)
            .await;
    }

    let config = create_test_config(&server.uri(), out.path(), 5, 1, 4);
    let (report, rows) = run_crawl(&config).await;

    let successes = rows.iter().filter(|r| r.is_success()).count();
    assert!(successes <= 5);
    assert_eq!(report.saved as usize, successes);
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn test_failures_are_indexed_and_do_not_stop_crawl() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_article(&server, "A", &["Missing", "Broken", "B"], 1).await;
    mount_article(&server, "B", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), out.path(), 10, 1, 2);
    let (report, rows) = run_crawl(&config).await;

    assert_eq!(report.saved, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.attempted, 4);
    assert_eq!(rows.len(), 4);

    let missing = rows.iter().find(|r| topic_of(r) == "Missing").unwrap();
    assert_eq!(missing.status, "404");
    assert!(missing.file.is_empty());
    assert!(missing.title.is_empty());
    assert_eq!(missing.bytes, 0);

    let broken = rows.iter().find(|r| topic_of(r) == "Broken").unwrap();
    assert_eq!(broken.status, "500");
    assert_eq!(broken.out_links, 0);
}

#[tokio::test]
async fn test_content_absent_page_is_recorded_without_expansion() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_article(&server, "A", &["Empty"], 1).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Empty</title></head>
            <body><p>No main content here</p><a href="/wiki/Hidden">x</a></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_article(&server, "Hidden", &[], 0).await;

    let config = create_test_config(&server.uri(), out.path(), 10, 3, 1);
    let (report, rows) = run_crawl(&config).await;

    assert_eq!(report.saved, 2);
    assert_eq!(report.empty, 1);
    assert_eq!(report.files_written(), 1);

    let empty = rows.iter().find(|r| topic_of(r) == "Empty").unwrap();
    assert_eq!(empty.status, "200");
    assert!(empty.file.is_empty());
    assert_eq!(empty.bytes, 0);
    assert!(!out.path().join("Empty.txt").exists());
}

#[tokio::test]
async fn test_unreachable_seed_ends_with_error_row() {
    let server = MockServer::builder().start().await;
    let base_url = server.uri();
    drop(server);

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base_url, out.path(), 3, 1, 1);
    let (report, rows) = run_crawl(&config).await;

    assert_eq!(report.saved, 0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "ERR");
}
