//! Bridge state shared by every entry point.

use std::sync::Arc;

use crate::config::{BridgeConfig, LocaleSettings};
use crate::error::BridgeError;
use crate::services::{
    CategoriesService, ContentService, IdentifierMappingService, ProductsService,
};
use crate::shopify::{AdminClient, GraphQLTransport};

/// All services wired to one transport.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    settings: Arc<LocaleSettings>,
    categories: Arc<CategoriesService>,
    content: Arc<ContentService>,
    products: Arc<ProductsService>,
    mapping: IdentifierMappingService,
}

impl Bridge {
    /// Build the bridge over a Shopify Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let client = AdminClient::new(&config.shopify)?;
        Ok(Self::with_transport(Arc::new(client), config.locale.clone()))
    }

    /// Build the bridge over any transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn GraphQLTransport>, settings: LocaleSettings) -> Self {
        let settings = Arc::new(settings);
        let categories = Arc::new(CategoriesService::new(
            Arc::clone(&transport),
            Arc::clone(&settings),
        ));
        let content = Arc::new(ContentService::new(
            Arc::clone(&transport),
            Arc::clone(&settings),
        ));
        let products = Arc::new(ProductsService::new(transport, Arc::clone(&settings)));
        let mapping = IdentifierMappingService::new(
            categories.clone(),
            content.clone(),
            products.clone(),
            Arc::clone(&settings),
        );

        Self {
            inner: Arc::new(BridgeInner {
                settings,
                categories,
                content,
                products,
                mapping,
            }),
        }
    }

    /// Language settings.
    #[must_use]
    pub fn settings(&self) -> &LocaleSettings {
        &self.inner.settings
    }

    /// Category operations.
    #[must_use]
    pub fn categories(&self) -> &CategoriesService {
        &self.inner.categories
    }

    /// Content page operations.
    #[must_use]
    pub fn content(&self) -> &ContentService {
        &self.inner.content
    }

    /// Product operations.
    #[must_use]
    pub fn products(&self) -> &ProductsService {
        &self.inner.products
    }

    /// URL ⇄ identifier mapping.
    #[must_use]
    pub fn mapping(&self) -> &IdentifierMappingService {
        &self.inner.mapping
    }
}
