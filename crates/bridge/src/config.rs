//! Bridge configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_BASE_URL` - Store URL (e.g., <https://your-store.myshopify.com>)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `SHOPIFY_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `DEFAULT_LANG` - Language whose values are the Shopify defaults (default: en)
//! - `LANGUAGE_MAP` - JSON object mapping short languages to storefront
//!   locales, e.g. `{"de": "de-de"}` (default: empty)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use shopify_bridge_core::locale::DEFAULT_LANG_SENTINEL;
use thiserror::Error;
use url::Url;

const DEFAULT_API_VERSION: &str = "2026-01";
const DEFAULT_LANG: &str = "en";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Language settings threaded into every service
    pub locale: LocaleSettings,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store base URL
    pub base_url: Url,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: SecretString,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ShopifyConfig {
    /// GraphQL endpoint for the configured store and API version.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "{}/admin/api/{}/graphql.json",
            self.base_url.as_str().trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Default language and storefront locale table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    /// Language whose values are stored as the Shopify defaults
    pub default_lang: String,
    /// Short language → storefront locale (e.g., `de` → `de-de`)
    pub language_map: HashMap<String, String>,
}

impl LocaleSettings {
    /// Settings with an empty locale table.
    #[must_use]
    pub fn new(default_lang: impl Into<String>) -> Self {
        Self {
            default_lang: default_lang.into(),
            language_map: HashMap::new(),
        }
    }

    /// Replace the locale table.
    #[must_use]
    pub fn with_language_map(mut self, language_map: HashMap<String, String>) -> Self {
        self.language_map = language_map;
        self
    }

    /// Storefront locale for `lang`, or `lang` itself when unmapped.
    #[must_use]
    pub fn storefront_locale<'a>(&'a self, lang: &'a str) -> &'a str {
        self.language_map.get(lang).map_or(lang, String::as_str)
    }

    /// Locale sent to the backend's `translations(locale:)` argument.
    #[must_use]
    pub fn backend_locale<'a>(&'a self, lang: Option<&'a str>) -> &'a str {
        match lang {
            Some(lang) if !lang.is_empty() && lang != DEFAULT_LANG_SENTINEL => lang,
            _ => &self.default_lang,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = env
            .required("SHOPIFY_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_BASE_URL".to_string(), e.to_string()))?;
        let access_token = env.validated_secret("SHOPIFY_ACCESS_TOKEN")?;
        let api_version = env.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION);
        let timeout_secs = env
            .or_default("SHOPIFY_REQUEST_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let default_lang = env.or_default("DEFAULT_LANG", DEFAULT_LANG);
        let language_map = match env.optional("LANGUAGE_MAP") {
            Some(raw) => serde_json::from_str::<HashMap<String, String>>(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("LANGUAGE_MAP".to_string(), e.to_string())
            })?,
            None => HashMap::new(),
        };

        Ok(Self {
            shopify: ShopifyConfig {
                base_url,
                api_version,
                access_token,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            locale: LocaleSettings::new(default_lang).with_language_map(language_map),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Token length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
