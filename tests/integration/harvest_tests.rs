//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, extract and write cycle end-to-end.

use quote_harvest::config::{Config, FetchConfig, OutputConfig, PaginationConfig, SiteConfig};
use quote_harvest::crawler::{run_harvest, HttpPageSource, RetryPolicy};
use quote_harvest::output::read_quotes;
use quote_harvest::{collect_quotes, EndReason, FetchResult, HarvestError, PageSource, Quote};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the given server and output file
fn create_test_config(base_url: &str, output: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
        },
        fetch: FetchConfig {
            timeout_secs: 5,
            max_retries: 0,
            backoff_base_ms: 1,
            user_agent: "TestHarvester/1.0".to_string(),
        },
        pagination: PaginationConfig::default(),
        output: OutputConfig {
            path: output.to_string_lossy().into_owned(),
            tag_delimiter: ";".to_string(),
        },
    }
}

/// Renders a listing page shaped like the real site
fn listing_page(quotes: &[Quote]) -> String {
    let body: String = quotes
        .iter()
        .map(|quote| {
            let tags: String = quote
                .tags
                .iter()
                .map(|t| format!(r#"<a class="tag" href="/tag/{t}/page/1/">{t}</a>"#))
                .collect();
            format!(
                r#"<div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
                    <span class="text" itemprop="text">{}</span>
                    <span>by <small class="author" itemprop="author">{}</small>
                    <a href="/author/x">(about)</a></span>
                    <div class="tags">Tags: <meta class="keywords" content="">{}</div>
                </div>"#,
                quote.text, quote.author, tags
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html><html lang="en"><head><title>Quotes to Scrape</title></head>
        <body><div class="container"><div class="row"><div class="col-md-8">{}</div></div></div></body></html>"#,
        body
    )
}

fn empty_page() -> String {
    r#"<!DOCTYPE html><html><head><title>Quotes to Scrape</title></head>
    <body><div class="col-md-8">No quotes found!<ul class="pager"></ul></div></body></html>"#
        .to_string()
}

fn quote(text: &str, author: &str, tags: &[&str]) -> Quote {
    Quote::new(text, author, tags.iter().map(|t| t.to_string()).collect())
}

async fn mount_page(server: &MockServer, page: u32, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/page/{}", page)))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_then_empty_page() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        200,
        listing_page(&[quote("Hello", "A", &["x", "y"])]),
    )
    .await;
    mount_page(&mock_server, 2, 200, empty_page()).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let summary = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.quotes_written, 1);
    assert_eq!(summary.end, EndReason::NoQuotes);

    let content = std::fs::read_to_string(&output).expect("Failed to read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["text,author,tags", "Hello,A,x;y"]);
}

#[tokio::test]
async fn test_multiple_pages_in_order() {
    let mock_server = MockServer::start().await;
    let page_one = vec![
        quote(
            "“The world as we have created it is a process of our thinking.”",
            "Albert Einstein",
            &["change", "deep-thoughts", "thinking", "world"],
        ),
        quote(
            "“It is our choices, Harry, that show what we truly are.”",
            "J.K. Rowling",
            &["abilities", "choices"],
        ),
    ];
    let page_two = vec![quote(
        "“Try not to become a man of success.”",
        "Albert Einstein",
        &[],
    )];
    mount_page(&mock_server, 1, 200, listing_page(&page_one)).await;
    mount_page(&mock_server, 2, 200, listing_page(&page_two)).await;
    mount_page(&mock_server, 3, 404, String::new()).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let summary = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.quotes_written, 3);
    assert_eq!(summary.end, EndReason::HttpStatus(404));

    let expected: Vec<Quote> = page_one.into_iter().chain(page_two).collect();
    let written = read_quotes(&output, ";").expect("Failed to read back quotes");
    assert_eq!(written, expected);
}

#[tokio::test]
async fn test_http_failure_and_empty_page_terminate_alike() {
    let not_found = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(2)
        .mount(&not_found)
        .await;

    let empty = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(2)
        .mount(&empty)
        .await;

    let mut reasons = Vec::new();
    for server in [&not_found, &empty] {
        let mut source = HttpPageSource::from_config(&server.uri(), &FetchConfig::default())
            .expect("Failed to build page source");

        match source.fetch_page(1).await.expect("Fetch failed") {
            FetchResult::Exhausted(reason) => reasons.push(reason),
            FetchResult::Page(_) => panic!("expected the sentinel from {}", server.uri()),
        }

        let harvest = collect_quotes(&mut source, &PaginationConfig::default())
            .await
            .expect("Harvest failed");
        assert!(harvest.quotes.is_empty());
        assert_eq!(harvest.pages_fetched, 0);
    }

    assert_eq!(reasons, vec![EndReason::HttpStatus(404), EndReason::NoQuotes]);
}

#[tokio::test]
async fn test_server_error_ends_pagination_without_retry() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 200, listing_page(&[quote("One", "A", &[])])).await;
    // expect(1): a status code is an answer, not a transport failure
    mount_page(&mock_server, 2, 503, String::new()).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let mut config = create_test_config(&mock_server.uri(), &output);
    config.fetch.max_retries = 3;

    let summary = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(summary.quotes_written, 1);
    assert_eq!(summary.end, EndReason::HttpStatus(503));
}

#[tokio::test]
async fn test_page_limit_stops_early() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 200, listing_page(&[quote("One", "A", &[])])).await;
    mount_page(&mock_server, 2, 200, listing_page(&[quote("Two", "B", &[])])).await;
    Mock::given(method("GET"))
        .and(path("/page/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let mut config = create_test_config(&mock_server.uri(), &output);
    config.pagination.max_pages = Some(2);

    let summary = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(summary.quotes_written, 2);
    assert_eq!(summary.end, EndReason::PageLimit(2));
}

#[tokio::test]
async fn test_malformed_quote_aborts_without_output() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, 1, 200, listing_page(&[quote("One", "A", &[])])).await;
    mount_page(
        &mock_server,
        2,
        200,
        r#"<html><body><div class="quote"><span class="text">No author here</span></div></body></html>"#
            .to_string(),
    )
    .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let err = run_harvest(&config).await.unwrap_err();

    assert!(matches!(err, HarvestError::Extract { page: 2, .. }));
    assert!(!output.exists(), "No partial output should be written");
}

#[tokio::test]
async fn test_connection_failure_is_fatal_after_retries() {
    // Reserve a port, then free it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("No local addr").port()
    };
    let base_url = format!("http://127.0.0.1:{}/", port);

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let mut config = create_test_config(&base_url, &output);
    config.fetch.max_retries = 2;

    let err = run_harvest(&config).await.unwrap_err();

    match err {
        HarvestError::Http { url, .. } => assert!(url.ends_with("/page/1")),
        other => panic!("unexpected error: {}", other),
    }
    assert!(!output.exists(), "No partial output should be written");
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .and(wiremock::matchers::header("user-agent", "TestHarvester/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), &output);

    let summary = run_harvest(&config).await.expect("Harvest failed");

    assert_eq!(summary.quotes_written, 0);
    let content = std::fs::read_to_string(&output).expect("Failed to read output");
    assert_eq!(content, "text,author,tags\n");
}

#[tokio::test]
async fn test_timeout_is_retried_until_page_arrives() {
    let mock_server = MockServer::start().await;

    // First attempt outlives the client timeout
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(empty_page())
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing_page(&[quote("Again", "A", &[])])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetch = FetchConfig {
        timeout_secs: 1,
        max_retries: 1,
        backoff_base_ms: 1,
        ..FetchConfig::default()
    };
    let mut source =
        HttpPageSource::from_config(&mock_server.uri(), &fetch).expect("Failed to build page source");

    let result = source.fetch_page(1).await.expect("Retry did not recover");

    assert!(matches!(result, FetchResult::Page(_)));
    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_timeout_without_retries_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[quote("Late", "A", &[])]))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetch = FetchConfig {
        timeout_secs: 1,
        max_retries: 0,
        ..FetchConfig::default()
    };
    let mut source =
        HttpPageSource::from_config(&mock_server.uri(), &fetch).expect("Failed to build page source");

    let err = source.fetch_page(1).await.unwrap_err();

    match err {
        HarvestError::Http { source, .. } => assert!(source.is_timeout()),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_retry_policy_none_never_waits() {
    let policy = RetryPolicy::none();
    assert_eq!(policy.max_retries, 0);
    assert_eq!(policy.delay_for(1), std::time::Duration::ZERO);
}
