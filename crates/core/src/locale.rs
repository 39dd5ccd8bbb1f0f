//! Locale-aware field resolution.
//!
//! Backend queries request `translations(locale: $locale)`, so the
//! translation list attached to a node is already scoped to the requested
//! language. Resolution only decides, per field, whether a usable
//! translation exists; a missing one silently falls back to the default
//! value.

use crate::types::Translation;

/// Sentinel language meaning "use the default-locale values".
pub const DEFAULT_LANG_SENTINEL: &str = "default";

/// A field that can carry a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatableField {
    /// The resource title / label.
    Title,
    /// The URL handle.
    Handle,
}

impl TranslatableField {
    /// Key used by the backend for this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Handle => "handle",
        }
    }
}

/// The requested language of one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleContext<'a> {
    lang: Option<&'a str>,
}

impl<'a> LocaleContext<'a> {
    /// Create a context for the requested language.
    #[must_use]
    pub const fn new(lang: Option<&'a str>) -> Self {
        Self { lang }
    }

    /// Whether default-locale values must be used unconditionally.
    #[must_use]
    pub fn is_default(&self) -> bool {
        match self.lang {
            None => true,
            Some(lang) => lang.is_empty() || lang == DEFAULT_LANG_SENTINEL,
        }
    }

    /// The non-empty translation of `field`, if one applies.
    ///
    /// Only the first entry with a matching key is considered.
    #[must_use]
    pub fn translated<'t>(
        &self,
        field: TranslatableField,
        translations: &'t [Translation],
    ) -> Option<&'t str> {
        if self.is_default() {
            return None;
        }
        translations
            .iter()
            .find(|t| t.key == field.key())
            .and_then(|t| t.value.as_deref())
            .filter(|value| !value.is_empty())
    }

    /// Resolve `field` to its translation or the default value.
    #[must_use]
    pub fn resolve<'t>(
        &self,
        default: &'t str,
        field: TranslatableField,
        translations: &'t [Translation],
    ) -> &'t str {
        self.translated(field, translations).unwrap_or(default)
    }

    /// Like [`resolve`](Self::resolve) for a field whose default may be missing.
    #[must_use]
    pub fn resolve_opt<'t>(
        &self,
        default: Option<&'t str>,
        field: TranslatableField,
        translations: &'t [Translation],
    ) -> Option<&'t str> {
        self.translated(field, translations).or(default)
    }
}
