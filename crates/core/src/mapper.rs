//! Raw node to normalized resource conversion.
//!
//! One function per resource shape. All of them decode the composite id and
//! apply locale resolution field by field.

use crate::locale::{LocaleContext, TranslatableField};
use crate::types::{Category, NormalizedResource, ParentRef, RawNode, decode_gid};

/// Map a collection node to a flat category.
///
/// Collections carry no parent relation, so the parent is always
/// [`ParentRef::Root`].
#[must_use]
pub fn map_category(node: &RawNode, ctx: LocaleContext<'_>) -> Category {
    Category {
        id: decode_gid(&node.id).to_owned(),
        label: ctx
            .resolve(&node.title, TranslatableField::Title, node.translations())
            .to_owned(),
        parent: ParentRef::Root,
    }
}

/// Map a collection node to a plain `{id, label}` resource.
#[must_use]
pub fn map_category_resource(node: &RawNode, ctx: LocaleContext<'_>) -> NormalizedResource {
    let category = map_category(node, ctx);
    NormalizedResource {
        id: category.id,
        label: category.label,
        extract: None,
        image: None,
        thumbnail: None,
    }
}

/// Map a page node; `extract` is the resolved handle as a path (`/about-us`).
#[must_use]
pub fn map_content(node: &RawNode, ctx: LocaleContext<'_>) -> NormalizedResource {
    let translations = node.translations();
    let label = ctx.resolve(&node.title, TranslatableField::Title, translations);
    let handle = ctx
        .resolve_opt(node.handle.as_deref(), TranslatableField::Handle, translations)
        .filter(|handle| !handle.is_empty());

    NormalizedResource {
        id: decode_gid(&node.id).to_owned(),
        label: label.to_owned(),
        extract: handle.map(|handle| format!("/{handle}")),
        image: None,
        thumbnail: None,
    }
}

/// Map a product node; the first image doubles as thumbnail.
#[must_use]
pub fn map_product(node: &RawNode, ctx: LocaleContext<'_>) -> NormalizedResource {
    let image = node.first_image_src().map(str::to_owned);

    NormalizedResource {
        id: decode_gid(&node.id).to_owned(),
        label: ctx
            .resolve(&node.title, TranslatableField::Title, node.translations())
            .to_owned(),
        extract: node
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
            .map(str::to_owned),
        thumbnail: image.clone(),
        image,
    }
}
