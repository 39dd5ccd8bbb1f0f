//! Error types for the bridge.
//!
//! Lookups that miss return `None`; only transport failures, invalid input
//! and rejected mutations are errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an unexpected status code.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as received.
        body: String,
    },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Caller input rejected before any request was issued.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A mutation reported user errors.
    #[error("Shopify {operation} failed: {}", format_user_errors(.errors))]
    UserErrors {
        /// Mutation name (e.g. `pageCreate`).
        operation: &'static str,
        /// Errors reported by the backend.
        errors: Vec<UserError>,
    },

    /// A mutation returned neither an entity nor user errors.
    #[error("Shopify {0} failed: no entity returned")]
    MissingEntity(&'static str),
}

impl BridgeError {
    /// Whether the error was caused by the caller's input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with a message only.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A `userErrors` entry of a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Path of the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            format!("{field}: {}", e.message)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
