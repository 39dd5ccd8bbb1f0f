//! Content page payload sent by the content platform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use shopify_bridge_core::TranslatableField;

/// A value given either once or per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Localized {
    /// One value for every locale.
    Single(String),
    /// Locale → value, in the order the caller sent them.
    PerLocale(IndexMap<String, String>),
}

impl Localized {
    /// Value stored as the backend default.
    ///
    /// For a per-locale map that is the non-empty `default_lang` entry,
    /// otherwise the first entry.
    #[must_use]
    pub fn default_value(&self, default_lang: &str) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::PerLocale(values) => values
                .get(default_lang)
                .filter(|value| !value.is_empty())
                .or_else(|| values.values().next())
                .map(String::as_str),
        }
    }

    /// The per-locale map, if the value was given per locale.
    #[must_use]
    pub const fn per_locale(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Self::Single(_) => None,
            Self::PerLocale(values) => Some(values),
        }
    }
}

/// Page payload of create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgePage {
    /// Title, once or per locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Localized>,
    /// Preferred handle source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_uid: Option<Localized>,
    /// Handle, used when `page_uid` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<Localized>,
    /// Per-locale handles registered as translations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Localized>,
    /// Whether the page is published (default: true).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,
    /// Template suffix (default: `content`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// `PageCreateInput` / `PageUpdateInput` of the Admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub is_published: bool,
    pub template_suffix: String,
}

/// `TranslationInput` of `translationsRegister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TranslationInput {
    pub locale: String,
    pub key: &'static str,
    pub value: String,
    pub translatable_content_digest: String,
}

impl BridgePage {
    /// Page input with default-locale values.
    pub(crate) fn to_page_input(&self, default_lang: &str) -> PageInput {
        let handle = self
            .page_uid
            .as_ref()
            .filter(|uid| !matches!(uid, Localized::Single(value) if value.is_empty()))
            .or(self.handle.as_ref());

        PageInput {
            title: self
                .label
                .as_ref()
                .and_then(|label| label.default_value(default_lang))
                .map(str::to_owned),
            handle: handle
                .and_then(|handle| handle.default_value(default_lang))
                .map(str::to_owned),
            is_published: self.released.unwrap_or(true),
            template_suffix: self
                .template
                .clone()
                .filter(|template| !template.is_empty())
                .unwrap_or_else(|| "content".to_string()),
        }
    }

    /// Translations for every non-default locale of `label` and `path`.
    ///
    /// A field contributes nothing when its digest is unknown or its value
    /// was not given per locale.
    pub(crate) fn translations(
        &self,
        default_lang: &str,
        title_digest: Option<&str>,
        handle_digest: Option<&str>,
    ) -> Vec<TranslationInput> {
        let mut translations = Vec::new();
        for (field, source, digest) in [
            (TranslatableField::Title, &self.label, title_digest),
            (TranslatableField::Handle, &self.path, handle_digest),
        ] {
            let (Some(digest), Some(values)) = (digest, source.as_ref().and_then(Localized::per_locale))
            else {
                continue;
            };
            translations.extend(
                values
                    .iter()
                    .filter(|(locale, _)| locale.as_str() != default_lang)
                    .map(|(locale, value)| TranslationInput {
                        locale: locale.clone(),
                        key: field.key(),
                        value: value.clone(),
                        translatable_content_digest: digest.to_string(),
                    }),
            );
        }
        translations
    }
}
