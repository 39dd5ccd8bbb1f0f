//! Products.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use shopify_bridge_core::mapper::map_product;
use shopify_bridge_core::{
    LocaleContext, NormalizedResource, RawNode, ResourceType, decode_gid, encode_gid,
};

use super::{
    ByIdsResult, HandleLookup, ListResult, count, fetch_count, fetch_nodes, fetch_page,
    list_variables, query_root,
};
use crate::config::LocaleSettings;
use crate::error::BridgeError;
use crate::pagination::paginate;
use crate::shopify::queries::{
    COUNT_PRODUCTS, LIST_PRODUCTS, PRODUCT_HANDLE_BY_ID, PRODUCT_ID_BY_HANDLE, PRODUCTS_BY_IDS,
};
use crate::shopify::{GraphQLTransport, HandleNode, IdNode};

/// Product listing and lookup.
#[derive(Clone)]
pub struct ProductsService {
    transport: Arc<dyn GraphQLTransport>,
    settings: Arc<LocaleSettings>,
}

impl ProductsService {
    /// Create a service on `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQLTransport>, settings: Arc<LocaleSettings>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// List one page of products.
    ///
    /// The backend filters by category when one is given, otherwise by
    /// keyword. With both, the keyword is matched locally against the
    /// resolved label.
    ///
    /// # Errors
    ///
    /// Returns the first failed request.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        category_id: Option<&str>,
        keyword: Option<&str>,
        lang: Option<&str>,
        page: u32,
    ) -> Result<ListResult<NormalizedResource>, BridgeError> {
        let category_id = category_id.filter(|c| !c.is_empty());
        let keyword = keyword.filter(|k| !k.is_empty());
        let locale = self.settings.backend_locale(lang);
        let filter = match (category_id, keyword) {
            (Some(category_id), _) => Some(format!("collection_id:{category_id}")),
            (None, Some(keyword)) => Some(format!("title:*{keyword}*")),
            (None, None) => None,
        };

        let fetched = paginate(
            |after| {
                fetch_page::<RawNode>(
                    self.transport.as_ref(),
                    &LIST_PRODUCTS,
                    "products",
                    list_variables(Some(locale), after, filter.as_deref()),
                )
            },
            page,
            || fetch_count(self.transport.as_ref(), &COUNT_PRODUCTS, "productsCount"),
        )
        .await?;

        let ctx = LocaleContext::new(lang);
        let mut products: Vec<NormalizedResource> =
            fetched.data.iter().map(|node| map_product(node, ctx)).collect();

        if let (Some(_), Some(keyword)) = (category_id, keyword) {
            let keyword = keyword.to_lowercase();
            products.retain(|product| product.label.to_lowercase().contains(&keyword));
        }

        let total = if keyword.is_some() || category_id.is_some() {
            count(products.len())
        } else {
            fetched.total
        };

        if fetched.is_beyond(page) {
            return Ok(ListResult::beyond_range(total, fetched.after_cursor));
        }

        Ok(ListResult {
            items: products,
            total,
            has_next: fetched.has_next_page,
            end_cursor: fetched.after_cursor,
        })
    }

    /// Fetch products by decoded id; unknown ids are left out.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError` if the request fails.
    #[instrument(skip(self))]
    pub async fn by_ids(
        &self,
        ids: &[String],
        lang: Option<&str>,
    ) -> Result<ByIdsResult<NormalizedResource>, BridgeError> {
        if ids.is_empty() {
            return Ok(ByIdsResult::empty());
        }

        let gids = ids
            .iter()
            .map(|id| encode_gid(ResourceType::Product, id))
            .collect();
        let nodes = fetch_nodes(
            self.transport.as_ref(),
            &PRODUCTS_BY_IDS,
            gids,
            self.settings.backend_locale(lang),
        )
        .await?;

        let ctx = LocaleContext::new(lang);
        Ok(ByIdsResult::from_items(
            nodes.iter().map(|node| map_product(node, ctx)).collect(),
        ))
    }
}

#[async_trait]
impl HandleLookup for ProductsService {
    #[instrument(skip(self))]
    async fn id_by_handle(&self, handle: &str) -> Result<Option<String>, BridgeError> {
        let node: Option<IdNode> = query_root(
            self.transport.as_ref(),
            &PRODUCT_ID_BY_HANDLE,
            "productByHandle",
            json!({ "handle": handle }),
        )
        .await?;
        Ok(node.map(|node| decode_gid(&node.id).to_owned()))
    }

    #[instrument(skip(self))]
    async fn handle_by_id(&self, id: &str) -> Result<Option<String>, BridgeError> {
        let node: Option<HandleNode> = query_root(
            self.transport.as_ref(),
            &PRODUCT_HANDLE_BY_ID,
            "node",
            json!({ "id": encode_gid(ResourceType::Product, id) }),
        )
        .await?;
        Ok(node.and_then(|node| node.handle).filter(|handle| !handle.is_empty()))
    }
}
