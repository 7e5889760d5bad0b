//! Integration tests for the polite fetcher
//!
//! These tests use wiremock to script server responses and check retry,
//! classification and concurrency behaviour.

use std::sync::Arc;
use std::time::{Duration, Instant};
use wiki_trawler::config::UserAgentConfig;
use wiki_trawler::crawler::{build_http_client, FailureReason, FetchOutcome, Pacer, PoliteFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_fetcher(max_parallel: usize, max_attempts: u32, timeout: Duration) -> PoliteFetcher {
    let client = build_http_client(&UserAgentConfig::default(), timeout).unwrap();
    PoliteFetcher::new(client, max_parallel, Pacer::immediate(), max_attempts)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_retry_converges_after_transient_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .mount(&server)
        .await;

    let fetcher = create_fetcher(1, 3, Duration::from_secs(5));
    let outcome = fetcher.fetch(&format!("{}/wiki/Flaky", server.uri())).await;

    assert_eq!(
        outcome,
        FetchOutcome::Success {
            status: 200,
            body: "finally".to_string(),
            attempts: 3,
        }
    );
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_retries_exhausted_on_persistent_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(1, 3, Duration::from_secs(5));
    let outcome = fetcher.fetch(&format!("{}/wiki/Down", server.uri())).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failure {
            last_status: Some(503),
            attempts: 3,
            reason: FailureReason::RetriesExhausted,
        }
    );
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Busy"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Busy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let fetcher = create_fetcher(1, 3, Duration::from_secs(5));
    let outcome = fetcher.fetch(&format!("{}/wiki/Busy", server.uri())).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(1, 3, Duration::from_secs(5));
    let outcome = fetcher.fetch(&format!("{}/wiki/Missing", server.uri())).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failure {
            last_status: Some(404),
            attempts: 1,
            reason: FailureReason::HardError,
        }
    );
}

#[tokio::test]
async fn test_timeout_is_transient_without_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = create_fetcher(1, 2, Duration::from_millis(100));
    let outcome = fetcher.fetch(&format!("{}/wiki/Slow", server.uri())).await;

    assert_eq!(
        outcome,
        FetchOutcome::Failure {
            last_status: None,
            attempts: 2,
            reason: FailureReason::RetriesExhausted,
        }
    );
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let server = MockServer::builder().start().await;
    let url = format!("{}/wiki/Gone", server.uri());
    drop(server);

    let fetcher = create_fetcher(1, 2, Duration::from_secs(2));
    let outcome = fetcher.fetch(&url).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Failure {
            last_status: None,
            attempts: 2,
            reason: FailureReason::RetriesExhausted,
        }
    ));
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    let user_agent = UserAgentConfig::default().header_value();

    Mock::given(method("GET"))
        .and(path("/wiki/Polite"))
        .and(header("user-agent", user_agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(1, 1, Duration::from_secs(5));
    let outcome = fetcher.fetch(&format!("{}/wiki/Polite", server.uri())).await;

    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_spacing_applies_after_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let pacer = Pacer::new(Duration::from_millis(150), Duration::ZERO);
    let fetcher = PoliteFetcher::new(client, 1, pacer, 1);

    let start = Instant::now();
    let outcome = fetcher.fetch(&format!("{}/wiki/Any", server.uri())).await;

    assert!(outcome.is_success());
    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn test_backoff_applies_between_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let pacer = Pacer::new(Duration::from_millis(100), Duration::ZERO);
    let fetcher = PoliteFetcher::new(client, 1, pacer, 3);

    let start = Instant::now();
    let outcome = fetcher.fetch(&format!("{}/wiki/Flaky", server.uri())).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 2);
    // Two spacing pauses plus one backoff of base * 1
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_permit_pool_serializes_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("ok")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let fetcher = Arc::new(create_fetcher(1, 1, Duration::from_secs(5)));
    let uri = server.uri();

    let start = Instant::now();
    let handles: Vec<_> = ["A", "B", "C"]
        .iter()
        .map(|topic| {
            let fetcher = Arc::clone(&fetcher);
            let url = format!("{}/wiki/{}", uri, topic);
            tokio::spawn(async move { fetcher.fetch(&url).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }

    // One permit: the three delayed responses cannot overlap
    assert!(start.elapsed() >= Duration::from_millis(600));
    assert_eq!(fetcher.available_permits(), 1);
}
