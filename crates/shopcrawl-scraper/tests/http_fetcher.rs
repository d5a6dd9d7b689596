//! Integration tests for `HttpFetcher` against a local wiremock server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopcrawl_scraper::{HttpFetcher, PageFetcher, ScraperError};

fn test_fetcher() -> HttpFetcher {
    HttpFetcher::new(5, "shopcrawl-test/0.1", 0, 0).expect("failed to build HttpFetcher")
}

#[tokio::test]
async fn returns_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let body = test_fetcher()
        .fetch(&format!("{}/page", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn not_found_is_typed_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(5, "shopcrawl-test/0.1", 3, 0).unwrap();
    let err = fetcher
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn unexpected_status_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_fetcher()
        .fetch(&format!("{}/broken", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn rate_limit_reports_domain_and_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&server)
        .await;

    let err = test_fetcher()
        .fetch(&format!("{}/limited", server.uri()))
        .await
        .unwrap_err();
    match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 17),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn transient_rate_limit_is_retried_to_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(5, "shopcrawl-test/0.1", 1, 0).unwrap();
    let body = fetcher
        .fetch(&format!("{}/flaky", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "recovered");
}
