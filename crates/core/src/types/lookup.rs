//! Results of the URL ⇄ identifier mapping.

use serde::{Deserialize, Serialize};

use super::id::ResourceType;

/// Resource type recognized from a storefront path section.
///
/// Unknown sections pass through unchanged so the caller can see what the
/// URL contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupType {
    /// One of `products`, `collections`, `pages`.
    Known(ResourceType),
    /// Any other section, verbatim.
    Unrecognized(String),
}

impl LookupType {
    /// Classify a storefront path section.
    #[must_use]
    pub fn from_section(section: &str) -> Self {
        ResourceType::from_section(section)
            .map_or_else(|| Self::Unrecognized(section.to_owned()), Self::Known)
    }

    /// The known resource type, if any.
    #[must_use]
    pub const fn resource_type(&self) -> Option<ResourceType> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Identifier resolved from a storefront URL.
///
/// `id` is `None` when the handle is unknown to the backend; that is a valid
/// "unmapped" answer, not an error. `type` and `lang` are `None` only when
/// the path matched neither `/{lang}/{section}/{handle}` nor
/// `/{section}/{handle}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Decoded numeric id.
    pub id: Option<String>,
    /// Resource type.
    #[serde(rename = "type")]
    pub kind: Option<LookupType>,
    /// Language taken from the path, or the configured default.
    pub lang: Option<String>,
}

/// Storefront URL built for an identifier (`None` when the id has no handle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontUrl {
    /// Relative storefront URL.
    pub url: Option<String>,
}
