//! Command implementations.
//!
//! Every command prints a single JSON document on stdout.

pub mod categories;
pub mod content;
pub mod mapping;
pub mod products;

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use shopify_bridge::{Bridge, BridgeConfig, BridgeError, ConfigError, with_items_key};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A bridge operation failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the bridge from environment configuration.
pub fn connect() -> Result<Bridge, CommandError> {
    let config = BridgeConfig::from_env()?;
    tracing::debug!(endpoint = %config.shopify.graphql_endpoint(), "Loaded configuration");
    Ok(Bridge::from_config(&config)?)
}

/// Print a list or by-ids result with its items under `items_key`.
fn print_items<R: Serialize>(result: &R, items_key: &str) -> Result<(), CommandError> {
    print_json(&with_items_key(result, items_key)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Read a JSON request body from `path`, or from stdin when `None`.
///
/// Malformed JSON is a validation error, reported before any request.
fn read_body(path: Option<&Path>) -> Result<Value, CommandError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };

    serde_json::from_str(&raw)
        .map_err(|e| BridgeError::Validation(format!("Request body is not valid JSON: {e}")).into())
}
