//! Composite id codec and resource kinds.
//!
//! Shopify identifies every resource with a global id such as
//! `gid://shopify/Product/123`. Everything handed to the content platform
//! uses the trailing numeric segment only; the composite form is rebuilt
//! right before a query is issued.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GID_PREFIX: &str = "gid://shopify";

/// The three resource kinds the bridge exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A Shopify product.
    Product,
    /// A Shopify custom collection.
    Category,
    /// A Shopify online store page.
    Content,
}

/// Error returned when parsing an unknown resource type.
#[derive(Debug, Clone, Error)]
#[error("unknown resource type: {0} (expected product, category or content)")]
pub struct UnknownResourceType(pub String);

impl ResourceType {
    /// Name used by the content platform (`product`, `category`, `content`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Category => "category",
            Self::Content => "content",
        }
    }

    /// Object type inside a Shopify global id.
    #[must_use]
    pub const fn gid_type(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Category => "Collection",
            Self::Content => "Page",
        }
    }

    /// Storefront path section (`/products/...`, `/collections/...`, `/pages/...`).
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Category => "collections",
            Self::Content => "pages",
        }
    }

    /// Resolve a storefront path section to its resource type.
    #[must_use]
    pub fn from_section(section: &str) -> Option<Self> {
        match section {
            "products" => Some(Self::Product),
            "collections" => Some(Self::Category),
            "pages" => Some(Self::Content),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "category" => Ok(Self::Category),
            "content" => Ok(Self::Content),
            _ => Err(UnknownResourceType(s.to_owned())),
        }
    }
}

/// Decode a composite id to its trailing path segment.
///
/// A value without any `/` is returned unchanged.
///
/// ```
/// use shopify_bridge_core::decode_gid;
///
/// assert_eq!(decode_gid("gid://shopify/Collection/42"), "42");
/// assert_eq!(decode_gid("42"), "42");
/// ```
#[must_use]
pub fn decode_gid(gid: &str) -> &str {
    gid.rsplit('/').next().unwrap_or(gid)
}

/// Build the composite id for a numeric id of the given kind.
#[must_use]
pub fn encode_gid(kind: ResourceType, id: &str) -> String {
    format!("{GID_PREFIX}/{}/{id}", kind.gid_type())
}
