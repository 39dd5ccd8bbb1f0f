//! Raw backend nodes and the normalized resources built from them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One translated field value as returned by `translations(locale:)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Translated field key (`title`, `handle`, ...).
    pub key: String,
    /// Translated value; may be empty.
    #[serde(default)]
    pub value: Option<String>,
    /// Locale of the translation.
    #[serde(default)]
    pub locale: Option<String>,
}

/// Product image as selected by `images(first: 1)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageNode {
    /// Image source URL.
    #[serde(default)]
    pub src: Option<String>,
}

/// Edge wrapper of an image connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageEdge {
    /// The image.
    pub node: ImageNode,
}

/// Image connection of a product node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageConnection {
    /// Image edges.
    #[serde(default)]
    pub edges: Vec<ImageEdge>,
}

/// Backend-shaped record for one collection, page or product.
///
/// Every field is lenient: a `nodes(ids:)` entry of another type comes back
/// as `{}` and deserializes into a node with an empty id, which callers
/// treat as a miss.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    /// Composite id (`gid://shopify/...`).
    #[serde(default)]
    pub id: String,
    /// Default-locale title.
    #[serde(default)]
    pub title: String,
    /// Default-locale handle.
    #[serde(default)]
    pub handle: Option<String>,
    /// Plain-text description (products only).
    #[serde(default)]
    pub description: Option<String>,
    /// First product image (products only).
    #[serde(default)]
    pub images: Option<ImageConnection>,
    /// Translations for the requested locale; `null` is accepted.
    #[serde(default)]
    pub translations: Option<Vec<Translation>>,
}

impl RawNode {
    /// Whether the node carries an id at all.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }

    /// Translations as a slice (empty when the backend sent none).
    #[must_use]
    pub fn translations(&self) -> &[Translation] {
        self.translations.as_deref().unwrap_or_default()
    }

    /// Source of the first image, if any.
    #[must_use]
    pub fn first_image_src(&self) -> Option<&str> {
        self.images
            .as_ref()?
            .edges
            .first()?
            .node
            .src
            .as_deref()
    }
}

/// Normalized resource handed to the content platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResource {
    /// Decoded numeric id, never the composite form.
    pub id: String,
    /// Locale-resolved label.
    pub label: String,
    /// Description (products) or `/{handle}` (content pages).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    /// Image URL (products).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Thumbnail URL (products).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Parent reference of a category.
///
/// Shopify collections have no native hierarchy, so every category hangs
/// off [`ParentRef::Root`] unless a parent id is supplied explicitly. The
/// root is its own variant so it can never collide with a real id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The implicit top of the hierarchy (serialized as `"root"`).
    #[default]
    Root,
    /// A concrete parent category id.
    Id(String),
}

impl ParentRef {
    const ROOT: &'static str = "root";

    /// Parent reference for an optional id; absent, empty and `"root"`
    /// all mean root.
    #[must_use]
    pub fn from_optional(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() && id != Self::ROOT => Self::Id(id.to_owned()),
            _ => Self::Root,
        }
    }
}

impl std::fmt::Display for ParentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str(Self::ROOT),
            Self::Id(id) => f.write_str(id),
        }
    }
}

impl std::str::FromStr for ParentRef {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_optional(Some(raw)))
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == Self::ROOT {
            Ok(Self::Root)
        } else {
            Ok(Self::Id(raw))
        }
    }
}

/// A flat, locale-resolved category with its parent reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Decoded numeric id.
    pub id: String,
    /// Locale-resolved label.
    pub label: String,
    /// Parent reference.
    #[serde(rename = "parentId")]
    pub parent: ParentRef,
}
