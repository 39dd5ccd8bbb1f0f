//! Product commands.

use shopify_bridge::Bridge;

use super::{CommandError, print_items};

pub async fn list(
    bridge: &Bridge,
    category_id: Option<&str>,
    keyword: Option<&str>,
    lang: Option<&str>,
    page: u32,
) -> Result<(), CommandError> {
    let result = bridge
        .products()
        .list(category_id, keyword, lang, page)
        .await?;
    tracing::info!(count = result.items.len(), total = result.total, "Listed products");
    print_items(&result, "products")
}

pub async fn by_ids(bridge: &Bridge, ids: &[String], lang: Option<&str>) -> Result<(), CommandError> {
    let result = bridge.products().by_ids(ids, lang).await?;
    print_items(&result, "products")
}
