//! Tests for the HTTP transport module

use super::*;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.base_params.is_empty());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("pagefeed/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com/")
        .base_param("client_id", "key-123")
        .timeout(Duration::from_secs(5))
        .rate_limit(RateLimiterConfig::per_hour(50, 1))
        .header("Accept-Version", "v1")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com/".to_string()));
    assert_eq!(
        config.base_params,
        vec![("client_id".to_string(), "key-123".to_string())]
    );
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_hour(50, 1)));
    assert_eq!(
        config.default_headers.get("Accept-Version"),
        Some(&"v1".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

// ============================================================================
// RawResponse Tests
// ============================================================================

#[test]
fn test_raw_response_header_lookup_is_case_insensitive() {
    let response = RawResponse::new(200, "[]")
        .with_header("X-Total", "4")
        .with_header("x-total", "9");

    assert!(response.is_ok());
    assert_eq!(response.header_first("x-total"), Some("4"));
    assert_eq!(response.header_first("X-TOTAL"), Some("4"));
    assert_eq!(response.headers["x-total"].len(), 2);
    assert_eq!(response.header_first("link"), None);
}

#[test]
fn test_raw_response_only_200_is_ok() {
    assert!(!RawResponse::new(201, "").is_ok());
    assert!(!RawResponse::new(401, "").is_ok());
    assert!(!RawResponse::new(500, "").is_ok());
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .insert_header("X-Total", "12"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("photos", &[]).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "[]");
    assert_eq!(response.header_first("X-Total"), Some("12"));
}

#[tokio::test]
async fn test_http_client_base_and_request_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(query_param("client_id", "key-123"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .base_param("client_id", "key-123")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get("/photos", &[("page".to_string(), "2".to_string())])
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photos"))
        .and(header("Accept-Version", "v1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("Accept-Version", "v1")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client.get("photos", &[]).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(401).set_body_string("OAuth error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("photos", &[]).await.unwrap();

    assert_eq!(response.status, 401);
    assert_eq!(response.body, "OAuth error");
    assert!(!response.is_ok());
}

#[tokio::test]
async fn test_http_client_connection_failure_is_an_error() {
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client.get("photos", &[]).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_http_client_full_url_ignores_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url("https://unused.example.com")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get(&format!("{}/absolute", mock_server.uri()), &[])
        .await
        .unwrap();
    assert_eq!(response.status, 204);
}

#[test]
fn test_build_url_joins_slashes() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.build_url("/photos"), "https://api.example.com/photos");
    assert_eq!(client.build_url("photos"), "https://api.example.com/photos");
}

#[tokio::test]
async fn test_http_client_with_rate_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .rate_limit(RateLimiterConfig::per_second(100, 10))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        client.get("photos", &[]).await.unwrap();
    }
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new().unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("HttpClient"));
    assert!(debug.contains("has_rate_limiter"));
}
