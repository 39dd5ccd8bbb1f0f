//! Content pages, backed by Shopify online store pages.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use shopify_bridge_core::mapper::map_content;
use shopify_bridge_core::{
    LocaleContext, NormalizedResource, RawNode, ResourceType, TranslatableField, decode_gid,
    encode_gid,
};

use super::bridge_page::{BridgePage, TranslationInput};
use super::{
    ByIdsResult, HandleLookup, ListResult, count, fetch_count, fetch_nodes, fetch_page,
    list_variables, query_root,
};
use crate::config::LocaleSettings;
use crate::error::{BridgeError, UserError};
use crate::pagination::{find_first, paginate};
use crate::shopify::queries::{
    COUNT_PAGES, CREATE_PAGE, DELETE_PAGE, LIST_PAGES, PAGE_HANDLE_BY_ID, PAGE_TRANSLATION_DIGESTS,
    PAGES_BY_IDS, REGISTER_TRANSLATIONS, SCAN_PAGE_HANDLES, UPDATE_PAGE,
};
use crate::shopify::{GraphQLTransport, HandleNode, IdNode};

/// Id of a newly created page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedContent {
    /// Decoded numeric id.
    pub id: String,
}

/// Payload of `pageCreate` / `pageUpdate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagePayload {
    #[serde(default)]
    page: Option<IdNode>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

/// Payload of `pageDelete`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletePayload {
    #[serde(default)]
    deleted_page_id: Option<String>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

/// Payload of `translationsRegister`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatableResource {
    #[serde(default)]
    translatable_content: Vec<TranslatableContent>,
}

#[derive(Debug, Deserialize)]
struct TranslatableContent {
    key: String,
    #[serde(default)]
    digest: Option<String>,
}

/// Digests of the translatable page fields.
#[derive(Debug, Default)]
struct Digests {
    title: Option<String>,
    handle: Option<String>,
}

impl Digests {
    fn from_content(content: &[TranslatableContent]) -> Self {
        let digest = |field: TranslatableField| {
            content
                .iter()
                .find(|entry| entry.key == field.key())
                .and_then(|entry| entry.digest.clone())
                .filter(|digest| !digest.is_empty())
        };
        Self {
            title: digest(TranslatableField::Title),
            handle: digest(TranslatableField::Handle),
        }
    }
}

/// Fail a mutation that returned no entity.
fn mutation_failed(operation: &'static str, errors: Vec<UserError>) -> BridgeError {
    if errors.is_empty() {
        BridgeError::MissingEntity(operation)
    } else {
        BridgeError::UserErrors { operation, errors }
    }
}

/// Content page listing, lookup and maintenance.
#[derive(Clone)]
pub struct ContentService {
    transport: Arc<dyn GraphQLTransport>,
    settings: Arc<LocaleSettings>,
}

impl ContentService {
    /// Create a service on `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQLTransport>, settings: Arc<LocaleSettings>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// List one page of content pages.
    ///
    /// # Errors
    ///
    /// Returns the first failed request.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        keyword: Option<&str>,
        lang: Option<&str>,
        page: u32,
    ) -> Result<ListResult<NormalizedResource>, BridgeError> {
        let keyword = keyword.filter(|k| !k.is_empty());
        let locale = self.settings.backend_locale(lang);
        let filter = keyword.map(|keyword| format!("title:*{keyword}*"));

        let fetched = paginate(
            |after| {
                fetch_page::<RawNode>(
                    self.transport.as_ref(),
                    &LIST_PAGES,
                    "pages",
                    list_variables(Some(locale), after, filter.as_deref()),
                )
            },
            page,
            || fetch_count(self.transport.as_ref(), &COUNT_PAGES, "pagesCount"),
        )
        .await?;

        let ctx = LocaleContext::new(lang);
        let content: Vec<NormalizedResource> =
            fetched.data.iter().map(|node| map_content(node, ctx)).collect();
        let total = if keyword.is_some() {
            count(content.len())
        } else {
            fetched.total
        };

        if fetched.is_beyond(page) {
            return Ok(ListResult::beyond_range(total, fetched.after_cursor));
        }

        Ok(ListResult {
            items: content,
            total,
            has_next: fetched.has_next_page,
            end_cursor: fetched.after_cursor,
        })
    }

    /// Fetch content pages by decoded id; unknown ids are left out.
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
            .map(|id| encode_gid(ResourceType::Content, id))
            .collect();
        let nodes = fetch_nodes(
            self.transport.as_ref(),
            &PAGES_BY_IDS,
            gids,
            self.settings.backend_locale(lang),
        )
        .await?;

        let ctx = LocaleContext::new(lang);
        Ok(ByIdsResult::from_items(
            nodes.iter().map(|node| map_content(node, ctx)).collect(),
        ))
    }

    /// Create a page and register its translations.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::UserErrors` if Shopify rejects the page, or the
    /// first failed request.
    #[instrument(skip(self, page), fields(label = ?page.label))]
    pub async fn create(&self, page: &BridgePage) -> Result<CreatedContent, BridgeError> {
        debug!(?page, "Creating content page");
        let input = page.to_page_input(&self.settings.default_lang);

        let payload: Option<PagePayload> = query_root(
            self.transport.as_ref(),
            &CREATE_PAGE,
            "pageCreate",
            json!({ "page": input }),
        )
        .await?;
        let payload = payload.ok_or(BridgeError::MissingEntity("pageCreate"))?;
        let created = payload
            .page
            .ok_or_else(|| mutation_failed("pageCreate", payload.user_errors))?;

        self.register_translations(&created.id, page).await?;

        Ok(CreatedContent {
            id: decode_gid(&created.id).to_owned(),
        })
    }

    /// Update page `id` from a raw request body and re-register translations.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Validation` before any request if `body` is not
    /// a page object, `BridgeError::UserErrors` if Shopify rejects the
    /// update, or the first failed request.
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: &str, body: &Value) -> Result<(), BridgeError> {
        if !body.is_object() {
            return Err(BridgeError::Validation(
                "Request body is required and must be an object for updating a content page."
                    .to_string(),
            ));
        }
        let page: BridgePage = serde_json::from_value(body.clone())
            .map_err(|e| BridgeError::Validation(format!("Invalid content page: {e}")))?;

        debug!(?page, "Updating content page");
        let gid = encode_gid(ResourceType::Content, id);
        let input = page.to_page_input(&self.settings.default_lang);

        let payload: Option<PagePayload> = query_root(
            self.transport.as_ref(),
            &UPDATE_PAGE,
            "pageUpdate",
            json!({ "id": gid, "page": input }),
        )
        .await?;
        let payload = payload.ok_or(BridgeError::MissingEntity("pageUpdate"))?;
        if payload.page.is_none() {
            return Err(mutation_failed("pageUpdate", payload.user_errors));
        }

        self.register_translations(&gid, &page).await
    }

    /// Delete page `id`.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::UserErrors` if Shopify did not delete the page,
    /// or the failed request.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), BridgeError> {
        let payload: Option<DeletePayload> = query_root(
            self.transport.as_ref(),
            &DELETE_PAGE,
            "pageDelete",
            json!({ "id": encode_gid(ResourceType::Content, id) }),
        )
        .await?;
        let payload = payload.ok_or(BridgeError::MissingEntity("pageDelete"))?;

        match payload.deleted_page_id {
            Some(deleted) if !deleted.is_empty() => {
                debug!(%deleted, "Deleted content page");
                Ok(())
            }
            _ => Err(mutation_failed("pageDelete", payload.user_errors)),
        }
    }

    async fn digests(&self, resource_id: &str) -> Result<Digests, BridgeError> {
        let resource: Option<TranslatableResource> = query_root(
            self.transport.as_ref(),
            &PAGE_TRANSLATION_DIGESTS,
            "translatableResource",
            json!({ "resourceId": resource_id }),
        )
        .await?;

        Ok(resource
            .map(|resource| Digests::from_content(&resource.translatable_content))
            .unwrap_or_default())
    }

    /// Register the non-default-locale title and handle of `page`.
    async fn register_translations(&self, resource_id: &str, page: &BridgePage) -> Result<(), BridgeError> {
        let digests = self.digests(resource_id).await?;
        let translations: Vec<TranslationInput> = page.translations(
            &self.settings.default_lang,
            digests.title.as_deref(),
            digests.handle.as_deref(),
        );

        if translations.is_empty() {
            debug!(resource_id, "No translations to register");
            return Ok(());
        }

        let payload: Option<RegisterPayload> = query_root(
            self.transport.as_ref(),
            &REGISTER_TRANSLATIONS,
            "translationsRegister",
            json!({ "resourceId": resource_id, "translations": translations }),
        )
        .await?;

        if let Some(payload) = payload
            && !payload.user_errors.is_empty()
        {
            warn!(
                resource_id,
                errors = ?payload.user_errors,
                "Shopify rejected some translations"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl HandleLookup for ContentService {
    /// Scans the page listing, since pages cannot be queried by handle.
    #[instrument(skip(self))]
    async fn id_by_handle(&self, handle: &str) -> Result<Option<String>, BridgeError> {
        let found = find_first(
            |after| {
                let mut variables = json!({ "first": crate::pagination::PAGE_SIZE });
                if let Some(after) = after {
                    variables["after"] = Value::String(after);
                }
                fetch_page::<RawNode>(self.transport.as_ref(), &SCAN_PAGE_HANDLES, "pages", variables)
            },
            |node| node.handle.as_deref() == Some(handle),
        )
        .await?;

        Ok(found
            .filter(RawNode::is_present)
            .map(|node| decode_gid(&node.id).to_owned()))
    }

    #[instrument(skip(self))]
    async fn handle_by_id(&self, id: &str) -> Result<Option<String>, BridgeError> {
        let node: Option<HandleNode> = query_root(
            self.transport.as_ref(),
            &PAGE_HANDLE_BY_ID,
            "page",
            json!({ "id": encode_gid(ResourceType::Content, id) }),
        )
        .await?;
        Ok(node.and_then(|node| node.handle).filter(|handle| !handle.is_empty()))
    }
}
