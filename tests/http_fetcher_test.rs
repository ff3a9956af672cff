use httpmock::prelude::*;
use listing_alert::adapters::HttpFetcher;
use listing_alert::core::Fetcher;
use listing_alert::utils::error::TransportError;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_returns_body_and_status() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/buysell/list/");
            then.status(200).body("<div class=\"bsitem\"></div>");
        })
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
    let response = assert_ok!(fetcher.get(&server.url("/buysell/list/")).await);

    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.text(), "<div class=\"bsitem\"></div>");
}

#[tokio::test]
async fn test_non_2xx_is_returned_not_raised() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        })
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
    let response = assert_ok!(fetcher.get(&server.url("/missing")).await);

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_sends_user_agent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ua")
                .header("user-agent", concat!("listing-alert/", env!("CARGO_PKG_VERSION")));
            then.status(200);
        })
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
    assert_ok!(fetcher.get(&server.url("/ua")).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_slow_server_is_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(1500));
        })
        .await;

    let fetcher = HttpFetcher::new(Duration::from_millis(200)).unwrap();
    let err = assert_err!(fetcher.get(&server.url("/slow")).await);

    assert!(matches!(err, TransportError::Timeout { millis: 200, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
    let err = assert_err!(fetcher.get("http://127.0.0.1:9/").await);

    assert!(matches!(err, TransportError::Request { .. }));
}
