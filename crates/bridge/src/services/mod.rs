//! Resource services built on the GraphQL transport.
//!
//! Each service owns the queries of one resource type, maps raw nodes with
//! [`shopify_bridge_core::mapper`] and reconciles totals for filtered
//! listings. The mapping service sits beside them and only uses their
//! [`HandleLookup`] side.

mod bridge_page;
mod categories;
mod content;
mod mapping;
mod products;

pub use bridge_page::{BridgePage, Localized};
pub use categories::{CategoriesService, CategoryTree};
pub use content::{ContentService, CreatedContent};
pub use mapping::IdentifierMappingService;
pub use products::ProductsService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use shopify_bridge_core::RawNode;

use crate::error::BridgeError;
use crate::pagination::{PAGE_SIZE, PageResponse};
use crate::shopify::queries::Operation;
use crate::shopify::{Connection, Count, GraphQLTransport, NodesResponse, execute};

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    /// Items of the requested page.
    pub items: Vec<T>,
    /// Total matching items.
    pub total: u64,
    /// Whether another page follows.
    pub has_next: bool,
    /// Cursor after the last fetched page.
    pub end_cursor: Option<String>,
}

impl<T> ListResult<T> {
    /// Empty result for a page past the end of the listing.
    #[must_use]
    pub const fn beyond_range(total: u64, end_cursor: Option<String>) -> Self {
        Self {
            items: Vec::new(),
            total,
            has_next: false,
            end_cursor,
        }
    }
}

/// Result of a by-ids lookup; `total` counts the found items only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByIdsResult<T> {
    /// Found items, in backend order.
    pub items: Vec<T>,
    /// Number of found items.
    pub total: u64,
}

impl<T> ByIdsResult<T> {
    /// Empty result, returned without any request for an empty id list.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    fn from_items(items: Vec<T>) -> Self {
        Self {
            total: count(items.len()),
            items,
        }
    }
}

/// Serialize a list or by-ids result with `items` renamed to `items_key`.
///
/// # Errors
///
/// Returns an error if `result` cannot be serialized.
pub fn with_items_key<R: Serialize>(result: &R, items_key: &str) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(result)?;
    if let Some(object) = value.as_object_mut()
        && let Some(items) = object.remove("items")
    {
        object.insert(items_key.to_string(), items);
    }
    Ok(value)
}

/// Handle ⇄ id resolution of one resource type.
///
/// A miss is `Ok(None)`, never an error.
#[async_trait]
pub trait HandleLookup: Send + Sync {
    /// Decoded id of the resource with `handle`.
    async fn id_by_handle(&self, handle: &str) -> Result<Option<String>, BridgeError>;

    /// Default-locale handle of the resource with decoded `id`.
    async fn handle_by_id(&self, id: &str) -> Result<Option<String>, BridgeError>;
}

// =============================================================================
// Helper Functions
// =============================================================================

pub(crate) fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Take `root` out of a `data` object; `null` and absence both give `None`.
fn take_root<T: DeserializeOwned>(mut data: Map<String, Value>, root: &str) -> Result<Option<T>, BridgeError> {
    match data.remove(root) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Execute `operation` and read the object under `root`.
pub(crate) async fn query_root<T: DeserializeOwned>(
    transport: &dyn GraphQLTransport,
    operation: &Operation,
    root: &str,
    variables: Value,
) -> Result<Option<T>, BridgeError> {
    let data: Map<String, Value> = execute(transport, operation, variables).await?;
    take_root(data, root)
}

/// Variables of a listing page; `after` and `query` are sent only when set.
pub(crate) fn list_variables(locale: Option<&str>, after: Option<String>, filter: Option<&str>) -> Value {
    let mut variables = Map::new();
    variables.insert("first".to_string(), Value::from(PAGE_SIZE));
    if let Some(after) = after {
        variables.insert("after".to_string(), Value::String(after));
    }
    if let Some(locale) = locale {
        variables.insert("locale".to_string(), Value::String(locale.to_string()));
    }
    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        variables.insert("query".to_string(), Value::String(filter.to_string()));
    }
    Value::Object(variables)
}

/// Fetch one page of the connection under `root`.
pub(crate) async fn fetch_page<N: DeserializeOwned>(
    transport: &dyn GraphQLTransport,
    operation: &Operation,
    root: &str,
    variables: Value,
) -> Result<PageResponse<N>, BridgeError> {
    let connection: Connection<N> = query_root(transport, operation, root, variables)
        .await?
        .unwrap_or_default();

    Ok(PageResponse {
        end_cursor: connection.page_info.end_cursor.clone(),
        has_next_page: connection.page_info.has_next_page,
        items: connection.into_nodes(),
    })
}

/// Run a `*Count` query.
pub(crate) async fn fetch_count(
    transport: &dyn GraphQLTransport,
    operation: &Operation,
    root: &str,
) -> Result<u64, BridgeError> {
    let count: Option<Count> = query_root(transport, operation, root, Value::Object(Map::new())).await?;
    Ok(count.unwrap_or_default().count)
}

/// Run a `nodes(ids:)` query and drop misses.
pub(crate) async fn fetch_nodes(
    transport: &dyn GraphQLTransport,
    operation: &Operation,
    gids: Vec<String>,
    locale: &str,
) -> Result<Vec<RawNode>, BridgeError> {
    let requested = gids.len();
    let response: NodesResponse<RawNode> = execute(
        transport,
        operation,
        serde_json::json!({ "ids": gids, "locale": locale }),
    )
    .await?;

    let nodes: Vec<RawNode> = response
        .nodes
        .into_iter()
        .flatten()
        .filter(RawNode::is_present)
        .collect();

    if nodes.len() < requested {
        tracing::debug!(
            operation = operation.name,
            requested,
            found = nodes.len(),
            "Dropped ids with no matching node"
        );
    }
    Ok(nodes)
}
