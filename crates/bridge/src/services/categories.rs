//! Categories, backed by Shopify custom collections.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use shopify_bridge_core::mapper::{map_category, map_category_resource};
use shopify_bridge_core::tree::{CategoryNode, build_tree, count_categories, flatten, unreachable};
use shopify_bridge_core::{
    Category, LocaleContext, NormalizedResource, ParentRef, RawNode, ResourceType, decode_gid,
    encode_gid,
};

use super::{
    ByIdsResult, HandleLookup, ListResult, count, fetch_count, fetch_nodes, fetch_page,
    list_variables, query_root,
};
use crate::config::LocaleSettings;
use crate::error::BridgeError;
use crate::pagination::{collect_all, paginate};
use crate::shopify::queries::{
    COLLECTION_HANDLE_BY_ID, COLLECTION_ID_BY_HANDLE, COLLECTIONS_BY_IDS, COUNT_COLLECTIONS,
    LIST_COLLECTIONS,
};
use crate::shopify::{GraphQLTransport, HandleNode, IdNode};

const CUSTOM_COLLECTIONS: &str = "collection_type:custom";

/// Nested category tree with its node count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTree {
    /// Top-level nodes below the requested parent.
    pub categorytree: Vec<CategoryNode>,
    /// Number of nodes in the tree, nested ones included.
    pub total: u64,
}

/// Category listing, lookup and tree building.
#[derive(Clone)]
pub struct CategoriesService {
    transport: Arc<dyn GraphQLTransport>,
    settings: Arc<LocaleSettings>,
}

impl CategoriesService {
    /// Create a service on `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQLTransport>, settings: Arc<LocaleSettings>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    fn filter(keyword: Option<&str>) -> String {
        match keyword {
            Some(keyword) => format!("{CUSTOM_COLLECTIONS} AND title:*{keyword}*"),
            None => CUSTOM_COLLECTIONS.to_string(),
        }
    }

    async fn total(&self) -> Result<u64, BridgeError> {
        fetch_count(self.transport.as_ref(), &COUNT_COLLECTIONS, "collectionsCount").await
    }

    /// List one page of categories.
    ///
    /// Without `parent_id`, or with `root`, the mapped page is returned as
    /// is. With any other parent the page is arranged as the tree below that
    /// parent and flattened in pre-order.
    ///
    /// # Errors
    ///
    /// Returns the first failed request.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        parent_id: Option<&str>,
        keyword: Option<&str>,
        lang: Option<&str>,
        page: u32,
    ) -> Result<ListResult<Category>, BridgeError> {
        let keyword = keyword.filter(|k| !k.is_empty());
        let locale = self.settings.backend_locale(lang);
        let filter = Self::filter(keyword);

        let fetched = paginate(
            |after| {
                fetch_page::<RawNode>(
                    self.transport.as_ref(),
                    &LIST_COLLECTIONS,
                    "collections",
                    list_variables(Some(locale), after, Some(filter.as_str())),
                )
            },
            page,
            || self.total(),
        )
        .await?;

        let ctx = LocaleContext::new(lang);
        let mapped: Vec<Category> = fetched.data.iter().map(|node| map_category(node, ctx)).collect();

        let categories = match ParentRef::from_optional(parent_id) {
            ParentRef::Root => mapped.clone(),
            parent => {
                let dropped = unreachable(&mapped, &parent);
                if !dropped.is_empty() {
                    debug!(%parent, ?dropped, "Categories not reachable from parent");
                }
                flatten(&build_tree(&mapped, &parent))
            }
        };

        let total = if keyword.is_some() || categories.len() != mapped.len() {
            count(categories.len())
        } else {
            fetched.total
        };

        if fetched.is_beyond(page) {
            return Ok(ListResult::beyond_range(total, fetched.after_cursor));
        }

        Ok(ListResult {
            items: categories,
            total,
            has_next: fetched.has_next_page,
            end_cursor: fetched.after_cursor,
        })
    }

    /// Fetch categories by decoded id; unknown ids are left out.
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
            .map(|id| encode_gid(ResourceType::Category, id))
            .collect();
        let nodes = fetch_nodes(
            self.transport.as_ref(),
            &COLLECTIONS_BY_IDS,
            gids,
            self.settings.backend_locale(lang),
        )
        .await?;

        let ctx = LocaleContext::new(lang);
        Ok(ByIdsResult::from_items(
            nodes
                .iter()
                .map(|node| map_category_resource(node, ctx))
                .collect(),
        ))
    }

    /// Build the full category tree below `parent`.
    ///
    /// Every page of custom collections is fetched first.
    ///
    /// # Errors
    ///
    /// Returns the first failed request.
    #[instrument(skip(self))]
    pub async fn tree(&self, parent: &ParentRef, lang: Option<&str>) -> Result<CategoryTree, BridgeError> {
        let locale = self.settings.backend_locale(lang);

        let nodes = collect_all(|after| {
            fetch_page::<RawNode>(
                self.transport.as_ref(),
                &LIST_COLLECTIONS,
                "collections",
                list_variables(Some(locale), after, Some(CUSTOM_COLLECTIONS)),
            )
        })
        .await?;

        let ctx = LocaleContext::new(lang);
        let flat: Vec<Category> = nodes.iter().map(|node| map_category(node, ctx)).collect();
        let tree = build_tree(&flat, parent);
        let total = count(count_categories(&tree));

        debug!(fetched = flat.len(), total, "Built category tree");
        Ok(CategoryTree {
            categorytree: tree,
            total,
        })
    }
}

#[async_trait]
impl HandleLookup for CategoriesService {
    #[instrument(skip(self))]
    async fn id_by_handle(&self, handle: &str) -> Result<Option<String>, BridgeError> {
        let node: Option<IdNode> = query_root(
            self.transport.as_ref(),
            &COLLECTION_ID_BY_HANDLE,
            "collectionByHandle",
            json!({ "handle": handle }),
        )
        .await?;
        Ok(node.map(|node| decode_gid(&node.id).to_owned()))
    }

    #[instrument(skip(self))]
    async fn handle_by_id(&self, id: &str) -> Result<Option<String>, BridgeError> {
        let node: Option<HandleNode> = query_root(
            self.transport.as_ref(),
            &COLLECTION_HANDLE_BY_ID,
            "collection",
            json!({ "id": encode_gid(ResourceType::Category, id) }),
        )
        .await?;
        Ok(node.and_then(|node| node.handle).filter(|handle| !handle.is_empty()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::test_support::{FakeTransport, connection, settings};

    fn collection(id: &str, title: &str, translated: Option<&str>) -> Value {
        let translations: Vec<Value> = translated
            .map(|value| json!({"key": "title", "value": value, "locale": "de"}))
            .into_iter()
            .collect();
        json!({
            "id": format!("gid://shopify/Collection/{id}"),
            "title": title,
            "handle": title.to_lowercase(),
            "translations": translations
        })
    }

    fn service(transport: &Arc<FakeTransport>) -> CategoriesService {
        CategoriesService::new(transport.clone(), settings())
    }

    #[tokio::test]
    async fn test_list_translates_labels() {
        let transport = FakeTransport::new();
        transport
            .reply(&COUNT_COLLECTIONS, crate::test_support::count("collectionsCount", 5))
            .reply(
                &LIST_COLLECTIONS,
                connection(
                    "collections",
                    vec![
                        collection("123456789", "Electronics", Some("Elektronik")),
                        collection("123456790", "Clothing", Some("Kleidung")),
                    ],
                    Some("cursor-1"),
                    false,
                ),
            );

        let result = service(&transport)
            .list(None, None, Some("de"), 1)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&result.items).unwrap(),
            json!([
                {"id": "123456789", "label": "Elektronik", "parentId": "root"},
                {"id": "123456790", "label": "Kleidung", "parentId": "root"}
            ])
        );
        assert_eq!(result.total, 5);
        assert!(!result.has_next);
        assert_eq!(result.end_cursor.as_deref(), Some("cursor-1"));

        let list_call = &transport.calls_to(&LIST_COLLECTIONS)[0];
        assert_eq!(list_call.variables["locale"], "de");
        assert_eq!(list_call.variables["query"], "collection_type:custom");
        assert!(list_call.variables.get("after").is_none());
    }

    #[tokio::test]
    async fn test_list_keyword_recounts_total() {
        let transport = FakeTransport::new();
        transport
            .reply(&COUNT_COLLECTIONS, crate::test_support::count("collectionsCount", 40))
            .reply(
                &LIST_COLLECTIONS,
                connection(
                    "collections",
                    vec![collection("1", "Shirts", None)],
                    Some("c1"),
                    false,
                ),
            );

        let result = service(&transport)
            .list(None, Some("shirt"), None, 1)
            .await
            .unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].label, "Shirts");
        assert_eq!(
            transport.calls_to(&LIST_COLLECTIONS)[0].variables["query"],
            "collection_type:custom AND title:*shirt*"
        );
        assert_eq!(transport.calls_to(&LIST_COLLECTIONS)[0].variables["locale"], "en");
    }

    #[tokio::test]
    async fn test_list_with_parent_recounts_tree() {
        let transport = FakeTransport::new();
        transport
            .reply(&COUNT_COLLECTIONS, crate::test_support::count("collectionsCount", 2))
            .reply(
                &LIST_COLLECTIONS,
                connection(
                    "collections",
                    vec![collection("1", "A", None), collection("2", "B", None)],
                    None,
                    false,
                ),
            );

        let result = service(&transport)
            .list(Some("1"), None, None, 1)
            .await
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn test_list_explicit_root_parent_matches_tree() {
        let transport = FakeTransport::new();
        transport
            .reply(&COUNT_COLLECTIONS, crate::test_support::count("collectionsCount", 2))
            .reply(
                &LIST_COLLECTIONS,
                connection(
                    "collections",
                    vec![collection("1", "A", None), collection("2", "B", None)],
                    None,
                    false,
                ),
            );
        let categories = service(&transport);

        let listed = categories.list(Some("root"), None, None, 1).await.unwrap();
        let tree = categories
            .tree(&"root".parse().unwrap(), None)
            .await
            .unwrap();

        let ids: Vec<&str> = listed.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(listed.items.iter().all(|c| c.parent == ParentRef::Root));
        assert_eq!(listed.total, 2);
        assert_eq!(listed.total, tree.total);
    }

    #[tokio::test]
    async fn test_list_beyond_last_page_is_empty() {
        let transport = FakeTransport::new();
        transport
            .reply(&COUNT_COLLECTIONS, crate::test_support::count("collectionsCount", 3))
            .reply(
                &LIST_COLLECTIONS,
                connection(
                    "collections",
                    vec![collection("1", "A", None)],
                    Some("end"),
                    false,
                ),
            );

        let result = service(&transport)
            .list(None, None, None, 3)
            .await
            .unwrap();

        assert!(result.items.is_empty());
        assert!(!result.has_next);
        assert_eq!(result.total, 3);
        assert_eq!(result.end_cursor.as_deref(), Some("end"));
        assert_eq!(transport.calls_to(&LIST_COLLECTIONS).len(), 1);
    }

    #[tokio::test]
    async fn test_list_count_failure_aborts() {
        let transport = FakeTransport::new();
        transport.fail(&COUNT_COLLECTIONS, "connection reset");

        let err = service(&transport)
            .list(None, None, None, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Status { status: 503, .. }));
        assert!(transport.calls_to(&LIST_COLLECTIONS).is_empty());
    }

    #[tokio::test]
    async fn test_by_ids_empty_issues_no_request() {
        let transport = FakeTransport::new();
        let result = service(&transport).by_ids(&[], Some("de")).await.unwrap();

        assert_eq!(result, ByIdsResult::empty());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_by_ids_drops_misses() {
        let transport = FakeTransport::new();
        transport.reply(
            &COLLECTIONS_BY_IDS,
            json!({"nodes": [collection("1", "Shoes", Some("Schuhe")), null, {}]}),
        );

        let result = service(&transport)
            .by_ids(&["1".to_string(), "404".to_string(), "7".to_string()], Some("de"))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"items": [{"id": "1", "label": "Schuhe"}], "total": 1})
        );
        let call = &transport.calls_to(&COLLECTIONS_BY_IDS)[0];
        assert_eq!(
            call.variables["ids"],
            json!([
                "gid://shopify/Collection/1",
                "gid://shopify/Collection/404",
                "gid://shopify/Collection/7"
            ])
        );
    }

    #[tokio::test]
    async fn test_tree_scans_every_page() {
        let transport = FakeTransport::new();
        transport
            .reply(
                &LIST_COLLECTIONS,
                connection("collections", vec![collection("1", "A", None)], Some("c1"), true),
            )
            .reply(
                &LIST_COLLECTIONS,
                connection("collections", vec![collection("2", "B", None)], Some("c2"), false),
            );

        let tree = service(&transport)
            .tree(&ParentRef::Root, None)
            .await
            .unwrap();

        assert_eq!(tree.total, 2);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "categorytree": [{"id": "1", "label": "A"}, {"id": "2", "label": "B"}],
                "total": 2
            })
        );
        let calls = transport.calls_to(&LIST_COLLECTIONS);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].variables["after"], "c1");
        assert!(transport.calls_to(&COUNT_COLLECTIONS).is_empty());
    }

    #[tokio::test]
    async fn test_handle_lookups() {
        let transport = FakeTransport::new();
        transport
            .reply(
                &COLLECTION_ID_BY_HANDLE,
                json!({"collectionByHandle": {"id": "gid://shopify/Collection/55"}}),
            )
            .reply(&COLLECTION_HANDLE_BY_ID, json!({"collection": null}));

        let categories = service(&transport);
        assert_eq!(
            categories.id_by_handle("summer").await.unwrap().as_deref(),
            Some("55")
        );
        assert_eq!(categories.handle_by_id("404").await.unwrap(), None);
        assert_eq!(
            transport.calls_to(&COLLECTION_HANDLE_BY_ID)[0].variables["id"],
            "gid://shopify/Collection/404"
        );
    }
}
