//! Content page commands.

use std::path::Path;

use serde_json::json;
use shopify_bridge::{Bridge, BridgeError, BridgePage};

use super::{CommandError, print_items, print_json, read_body};

pub async fn list(
    bridge: &Bridge,
    keyword: Option<&str>,
    lang: Option<&str>,
    page: u32,
) -> Result<(), CommandError> {
    let result = bridge.content().list(keyword, lang, page).await?;
    tracing::info!(count = result.items.len(), total = result.total, "Listed content pages");
    print_items(&result, "content")
}

pub async fn by_ids(bridge: &Bridge, ids: &[String], lang: Option<&str>) -> Result<(), CommandError> {
    let result = bridge.content().by_ids(ids, lang).await?;
    print_items(&result, "content")
}

pub async fn create(bridge: &Bridge, body: Option<&Path>) -> Result<(), CommandError> {
    let body = read_body(body)?;
    let page: BridgePage = serde_json::from_value(body)
        .map_err(|e| BridgeError::Validation(format!("Invalid content page: {e}")))?;

    let created = bridge.content().create(&page).await?;
    tracing::info!(id = %created.id, "Created content page");
    print_json(&created)
}

pub async fn update(bridge: &Bridge, id: &str, body: Option<&Path>) -> Result<(), CommandError> {
    let body = read_body(body)?;
    bridge.content().update(id, &body).await?;
    tracing::info!(%id, "Updated content page");
    print_json(&json!({ "id": id }))
}

pub async fn delete(bridge: &Bridge, id: &str) -> Result<(), CommandError> {
    bridge.content().delete(id).await?;
    tracing::info!(%id, "Deleted content page");
    print_json(&json!({ "id": id }))
}
