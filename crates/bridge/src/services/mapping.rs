//! Storefront URL ⇄ identifier mapping.
//!
//! Storefront paths look like `/{lang}/{section}/{handle}` or, for the
//! default language, `/{section}/{handle}`. Sections map to resource types
//! through [`ResourceType::from_section`]; handles are resolved by the
//! service of that type.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use shopify_bridge_core::{LookupResult, LookupType, ResourceType, StorefrontUrl};

use super::HandleLookup;
use crate::config::LocaleSettings;
use crate::error::BridgeError;

/// `/{lang}/{section}/{handle}`
static LOCALIZED_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([^/]+)/([^/]+)/([^/]+)/?$").expect("Invalid regex"));

/// `/{section}/{handle}`
static DEFAULT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([^/]+)/([^/]+)/?$").expect("Invalid regex"));

/// Resolves storefront URLs to identifiers and back.
#[derive(Clone)]
pub struct IdentifierMappingService {
    categories: Arc<dyn HandleLookup>,
    content: Arc<dyn HandleLookup>,
    products: Arc<dyn HandleLookup>,
    settings: Arc<LocaleSettings>,
}

impl IdentifierMappingService {
    /// Create a mapping service over the handle lookups of each type.
    #[must_use]
    pub fn new(
        categories: Arc<dyn HandleLookup>,
        content: Arc<dyn HandleLookup>,
        products: Arc<dyn HandleLookup>,
        settings: Arc<LocaleSettings>,
    ) -> Self {
        Self {
            categories,
            content,
            products,
            settings,
        }
    }

    fn lookup_for(&self, kind: ResourceType) -> &dyn HandleLookup {
        match kind {
            ResourceType::Category => self.categories.as_ref(),
            ResourceType::Content => self.content.as_ref(),
            ResourceType::Product => self.products.as_ref(),
        }
    }

    /// Split a storefront path into `(lang, section, handle)`.
    fn parse_path<'a>(&'a self, path: &'a str) -> Option<(&'a str, &'a str, &'a str)> {
        if let Some(captures) = LOCALIZED_PATH_RE.captures(path) {
            let (_, [lang, section, handle]) = captures.extract();
            return Some((lang, section, handle));
        }
        let captures = DEFAULT_PATH_RE.captures(path)?;
        let (_, [section, handle]) = captures.extract();
        Some((self.settings.default_lang.as_str(), section, handle))
    }

    /// Resolve an absolute or relative storefront URL to `{id, type, lang}`.
    ///
    /// An unknown handle gives `id: None`. An unknown section is returned as
    /// is, without a lookup. A path of any other shape gives an all-`None`
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError` if the handle lookup fails.
    #[instrument(skip(self))]
    pub async fn lookup_url(&self, url: &str) -> Result<LookupResult, BridgeError> {
        let unmapped = LookupResult {
            id: None,
            kind: None,
            lang: None,
        };

        let path = if url.starts_with("http://") || url.starts_with("https://") {
            match Url::parse(url) {
                Ok(parsed) => parsed.path().to_owned(),
                Err(e) => {
                    debug!(error = %e, "Unparseable storefront URL");
                    return Ok(unmapped);
                }
            }
        } else {
            url.to_owned()
        };

        let Some((lang, section, handle)) = self.parse_path(&path) else {
            debug!(%path, "Path matches no storefront pattern");
            return Ok(unmapped);
        };

        let kind = LookupType::from_section(section);
        let id = match kind.resource_type() {
            Some(resource_type) => self.lookup_for(resource_type).id_by_handle(handle).await?,
            None => None,
        };

        debug!(?id, ?kind, lang, "Extracted identifier from URL");
        Ok(LookupResult {
            id,
            kind: Some(kind),
            lang: Some(lang.to_owned()),
        })
    }

    /// Build the relative storefront URL of a resource.
    ///
    /// `lang` is lowercased and defaults to the configured default language.
    /// Only the default language itself drops the locale prefix; any other
    /// language is mapped through the locale table.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError` if the handle lookup fails.
    #[instrument(skip(self))]
    pub async fn storefront_url(
        &self,
        kind: ResourceType,
        id: &str,
        lang: Option<&str>,
    ) -> Result<StorefrontUrl, BridgeError> {
        let lang = lang
            .filter(|lang| !lang.is_empty())
            .unwrap_or(self.settings.default_lang.as_str())
            .to_lowercase();

        let prefix = if lang == self.settings.default_lang {
            String::new()
        } else {
            format!("/{}", self.settings.storefront_locale(&lang))
        };

        let handle = self.lookup_for(kind).handle_by_id(id).await?;
        let url = handle.map(|handle| format!("{prefix}/{}/{handle}", kind.section()));

        debug!(?url, "Constructed storefront URL");
        Ok(StorefrontUrl { url })
    }
}
