//! Shopify Admin API transport (HIGH PRIVILEGE).
//!
//! # Architecture
//!
//! - [`GraphQLTransport`] is the seam between the services and the network:
//!   it posts one GraphQL document and returns the `data` object
//! - [`AdminClient`] implements it over `reqwest`
//! - Documents are static strings in [`queries`]; response shapes are plain
//!   `serde` structs next to the service that reads them
//!
//! No retries are performed here; a failed request fails the whole call.

mod client;
pub mod queries;

pub use client::AdminClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::BridgeError;
use queries::Operation;

/// One GraphQL request: a static document plus its variables.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    /// Document text.
    pub query: &'static str,
    /// Variables object.
    pub variables: serde_json::Value,
    /// Name of the operation inside the document.
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
}

impl GraphQLRequest {
    /// Build a request for `operation`.
    #[must_use]
    pub fn new(operation: &Operation, variables: serde_json::Value) -> Self {
        Self {
            query: operation.document,
            variables,
            operation_name: operation.name,
        }
    }
}

/// Posts GraphQL requests and returns the response `data` object.
///
/// Implementations surface every failure (network, status, GraphQL `errors`)
/// as a [`BridgeError`]; callers never see a partial response.
#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    /// Execute one request.
    async fn post(&self, request: &GraphQLRequest) -> Result<serde_json::Value, BridgeError>;
}

/// Execute `operation` and deserialize its `data` object.
pub(crate) async fn execute<T: DeserializeOwned>(
    transport: &dyn GraphQLTransport,
    operation: &Operation,
    variables: serde_json::Value,
) -> Result<T, BridgeError> {
    debug!(
        operation = operation.name,
        variables = %variables,
        "Performing GraphQL request"
    );

    let data = transport
        .post(&GraphQLRequest::new(operation, variables))
        .await?;
    Ok(serde_json::from_value(data)?)
}

// =============================================================================
// Shared response shapes
// =============================================================================

/// Cursor page info of a connection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows.
    #[serde(default)]
    pub has_next_page: bool,
    /// Cursor after the last returned edge.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// Edge wrapper of a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<N> {
    /// The node.
    pub node: N,
}

/// A cursor-paginated connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    /// Returned edges.
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<N>>,
    /// Pagination info.
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<N> Default for Connection<N> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

impl<N> Connection<N> {
    /// Nodes of the connection, in order.
    pub fn into_nodes(self) -> Vec<N> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// Result of a `*Count` query.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Count {
    /// Number of matching resources.
    #[serde(default)]
    pub count: u64,
}

/// Result of a `nodes(ids:)` query; misses come back as `null`.
#[derive(Debug, Clone, Deserialize)]
pub struct NodesResponse<N> {
    /// One entry per requested id.
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<N>>,
}

/// A selection holding only `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdNode {
    /// Composite id.
    pub id: String,
}

/// A selection holding only `handle`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandleNode {
    /// Handle, absent when the node is of another type.
    #[serde(default)]
    pub handle: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = GraphQLRequest::new(&queries::COUNT_PAGES, serde_json::json!({}));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["operationName"], "PagesCount");
        assert!(body["query"].as_str().unwrap().contains("pagesCount"));
        assert_eq!(body["variables"], serde_json::json!({}));
    }

    #[test]
    fn test_connection_tolerates_missing_parts() {
        let connection: Connection<IdNode> = serde_json::from_str("{}").unwrap();
        assert!(connection.edges.is_empty());
        assert!(!connection.page_info.has_next_page);
        assert!(connection.page_info.end_cursor.is_none());
    }

    #[test]
    fn test_connection_into_nodes() {
        let connection: Connection<IdNode> = serde_json::from_value(serde_json::json!({
            "edges": [{"node": {"id": "a"}}, {"node": {"id": "b"}}],
            "pageInfo": {"hasNextPage": true, "endCursor": "c2"}
        }))
        .unwrap();
        assert!(connection.page_info.has_next_page);
        let ids: Vec<String> = connection.into_nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_nodes_response_keeps_nulls() {
        let response: NodesResponse<IdNode> =
            serde_json::from_value(serde_json::json!({"nodes": [{"id": "a"}, null]})).unwrap();
        assert_eq!(response.nodes.len(), 2);
        assert!(response.nodes[1].is_none());
    }
}
