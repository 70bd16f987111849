// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Client Tests
 * Tests for response handling, content-type helpers, and failure paths
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;
use vuoto_scanner::http_client::HttpClient;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_http_client_get_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Success"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(30, 3).unwrap();
    let url = format!("{}/test", &mock_server.uri());
    let response = client.get(&url).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "Success");
}

#[tokio::test]
async fn test_error_status_is_returned_not_retried() {
    let mock_server = MockServer::start().await;

    // A server error is a response, not a transport failure; the client
    // must hand it back after a single request.
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(30, 3).unwrap();
    let url = format!("{}/broken", &mock_server.uri());
    let response = client.get(&url).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, "boom");
}

#[tokio::test]
async fn test_content_type_helpers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("\u{1}\u{2}", "image/png"),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(30, 3).unwrap();

    let page = client
        .get(&format!("{}/page", mock_server.uri()))
        .await
        .unwrap();
    assert!(page.is_text());
    assert!(page.is_html());

    let data = client
        .get(&format!("{}/data", mock_server.uri()))
        .await
        .unwrap();
    assert!(data.is_text());
    assert!(!data.is_html());

    let image = client
        .get(&format!("{}/image", mock_server.uri()))
        .await
        .unwrap();
    assert!(!image.is_text());
    assert!(!image.is_html());
}

#[tokio::test]
async fn test_header_lookup_is_case_insensitive() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("ok")
                .insert_header("x-request-id", "abc-123"),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(30, 3).unwrap();
    let response = client.get(&mock_server.uri()).await.unwrap();

    assert_eq!(response.header("X-Request-Id").as_deref(), Some("abc-123"));
    assert_eq!(response.header("x-request-id").as_deref(), Some("abc-123"));
    assert!(response.header("x-missing").is_none());
}

#[tokio::test]
async fn test_connection_refused_reports_error() {
    let client = HttpClient::new(5, 0).unwrap();
    let result = client.get("http://127.0.0.1:1/unreachable").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_per_request_timeout_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(30, 0).unwrap();
    let url = format!("{}/slow", &mock_server.uri());
    let result = client.get_with_timeout(&url, 1).await;

    assert!(result.is_err());
}
