//! Shopify Bridge - content platform adapter for the Shopify Admin API.
//!
//! This crate exposes Shopify collections, pages and products as the
//! normalized categories, content and products of a content platform, and
//! maps storefront URLs to identifiers and back.
//!
//! # Security
//!
//! The Admin API access token grants HIGH PRIVILEGE access to the store.
//! It is held as a `SecretString` and never logged.
//!
//! # Architecture
//!
//! - [`shopify`] - GraphQL transport seam and the `reqwest` client
//! - [`pagination`] - Cursor walking over any page fetcher
//! - [`services`] - Per-resource services and URL mapping
//! - [`Bridge`] - All services wired to one transport
//!
//! Requests are issued strictly one after another; a failed request fails
//! the whole operation without partial results.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod pagination;
pub mod services;
pub mod shopify;
pub mod state;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_support;

pub use config::{BridgeConfig, ConfigError, LocaleSettings, ShopifyConfig};
pub use error::BridgeError;
pub use services::{
    BridgePage, ByIdsResult, CategoriesService, CategoryTree, ContentService, CreatedContent,
    HandleLookup, IdentifierMappingService, ListResult, ProductsService, with_items_key,
};
pub use shopify::{AdminClient, GraphQLTransport};
pub use state::Bridge;
