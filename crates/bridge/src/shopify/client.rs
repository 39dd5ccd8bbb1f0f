//! `reqwest` implementation of [`GraphQLTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::ShopifyConfig;
use crate::error::{BridgeError, GraphQLError, GraphQLErrorLocation};

use super::{GraphQLRequest, GraphQLTransport};

/// Shopify Admin API GraphQL client.
///
/// # Security
///
/// Authenticates with a static Admin API access token, which has HIGH
/// PRIVILEGE access to the store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    /// Message of the most recent failed request.
    last_error: RwLock<Option<String>>,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token.clone(),
                last_error: RwLock::new(None),
            }),
        })
    }

    /// GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Message of the most recent failed request, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.last_error.read().await.clone()
    }

    async fn send(&self, request: &GraphQLRequest) -> Result<serde_json::Value, BridgeError> {
        let endpoint = &self.inner.endpoint;

        let response = self
            .inner
            .client
            .post(endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        info!("↳ Received response POST {endpoint} - {}", status.as_u16());

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(BridgeError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BridgeError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let graphql_response: GraphQLResponse = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(BridgeError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| BridgeError::GraphQL(vec![GraphQLError::message("No data in response")]))
    }
}

#[async_trait]
impl GraphQLTransport for AdminClient {
    async fn post(&self, request: &GraphQLRequest) -> Result<serde_json::Value, BridgeError> {
        match self.send(request).await {
            Ok(data) => Ok(data),
            Err(e) => {
                error!(
                    operation = request.operation_name,
                    error = %e,
                    "Shopify request failed"
                );
                *self.inner.last_error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }
}
