//! Integration tests for the Shopify Admin API transport.
//!
//! Run with: cargo test -p shopify-bridge-integration-tests

#![allow(clippy::unwrap_used)]

use serde_json::json;
use shopify_bridge::shopify::GraphQLRequest;
use shopify_bridge::shopify::queries::COUNT_PRODUCTS;
use shopify_bridge::{AdminClient, BridgeError, GraphQLTransport};
use shopify_bridge_integration_tests::{ACCESS_TOKEN, config, graphql_path, mock_operation};

fn client(server: &mockito::ServerGuard) -> AdminClient {
    AdminClient::new(&config(server).shopify).unwrap_or_else(|e| panic!("{e}"))
}

fn count_request() -> GraphQLRequest {
    GraphQLRequest::new(&COUNT_PRODUCTS, json!({}))
}

// ============================================================================
// Success
// ============================================================================

#[tokio::test]
async fn test_post_returns_data_object() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_operation(
        &mut server,
        COUNT_PRODUCTS.name,
        json!({"productsCount": {"count": 42}}),
    )
    .await;

    let client = client(&server);
    let data = client.post(&count_request()).await.unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(data, json!({"productsCount": {"count": 42}}));
    assert_eq!(client.last_error().await, None);
    assert!(client.endpoint().ends_with(&graphql_path()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_sends_document_and_variables() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", graphql_path().as_str())
        .match_header("X-Shopify-Access-Token", ACCESS_TOKEN)
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({
            "query": COUNT_PRODUCTS.document,
            "variables": {"locale": "de"},
            "operationName": COUNT_PRODUCTS.name,
        })))
        .with_status(200)
        .with_body(r#"{"data": {"productsCount": {"count": 1}}}"#)
        .expect(1)
        .create_async()
        .await;

    let request = GraphQLRequest::new(&COUNT_PRODUCTS, json!({"locale": "de"}));
    let result = client(&server).post(&request).await;

    assert!(result.is_ok());
    mock.assert_async().await;
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_rate_limited_uses_retry_after() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(429)
        .with_header("Retry-After", "7")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).post(&count_request()).await.unwrap_err();

    assert!(matches!(err, BridgeError::RateLimited(7)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limited_without_header_defaults() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(429)
        .create_async()
        .await;

    let err = client(&server).post(&count_request()).await.unwrap_err();

    assert!(matches!(err, BridgeError::RateLimited(60)));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(401)
        .with_body(r#"{"errors": "[API] Invalid API key or access token"}"#)
        .create_async()
        .await;

    let err = client(&server).post(&count_request()).await.unwrap_err();

    assert!(matches!(err, BridgeError::Unauthorized(_)));
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let err = client(&server).post(&count_request()).await.unwrap_err();

    match err {
        BridgeError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_graphql_errors_fail_and_are_remembered() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(200)
        .with_body(
            json!({
                "data": null,
                "errors": [{
                    "message": "Field 'bogus' doesn't exist on type 'QueryRoot'",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["query", "bogus"]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client(&server);
    let err = client.post(&count_request()).await.unwrap_err();

    assert!(matches!(&err, BridgeError::GraphQL(errors) if errors.len() == 1));
    let last = client.last_error().await.unwrap_or_default();
    assert!(last.contains("Field 'bogus' doesn't exist"), "{last}");
}

#[tokio::test]
async fn test_missing_data_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(200)
        .with_body(r#"{"data": null}"#)
        .create_async()
        .await;

    let err = client(&server).post(&count_request()).await.unwrap_err();

    assert!(err.to_string().contains("No data in response"), "{err}");
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", graphql_path().as_str())
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = client(&server);
    let result = client.post(&count_request()).await;

    assert!(result.is_err());
    assert!(client.last_error().await.is_some());
}
