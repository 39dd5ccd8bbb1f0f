//! Category commands.

use shopify_bridge::Bridge;
use shopify_bridge_core::ParentRef;

use super::{CommandError, print_items, print_json};

pub async fn list(
    bridge: &Bridge,
    parent_id: Option<&str>,
    keyword: Option<&str>,
    lang: Option<&str>,
    page: u32,
) -> Result<(), CommandError> {
    let result = bridge
        .categories()
        .list(parent_id, keyword, lang, page)
        .await?;
    tracing::info!(count = result.items.len(), total = result.total, "Listed categories");
    print_items(&result, "categories")
}

pub async fn by_ids(bridge: &Bridge, ids: &[String], lang: Option<&str>) -> Result<(), CommandError> {
    let result = bridge.categories().by_ids(ids, lang).await?;
    print_items(&result, "categories")
}

pub async fn tree(bridge: &Bridge, parent: &str, lang: Option<&str>) -> Result<(), CommandError> {
    let Ok(parent) = parent.parse::<ParentRef>();
    let tree = bridge.categories().tree(&parent, lang).await?;
    tracing::info!(total = tree.total, "Built category tree");
    print_json(&tree)
}
