//! Shopify Bridge Core - resource model shared by the bridge crates.
//!
//! This crate turns raw Shopify Admin API nodes into the normalized resource
//! shape handed to the content platform:
//! - `bridge` - GraphQL services, pagination and URL mapping
//! - `cli` - Command-line access to every bridge operation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything here is deterministic and can be tested without a
//! backend.
//!
//! # Modules
//!
//! - [`types`] - Raw nodes, normalized resources, composite ids, lookup results
//! - [`locale`] - Locale-aware field resolution
//! - [`mapper`] - Raw node to normalized resource conversion
//! - [`tree`] - Category tree construction and flattening

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod locale;
pub mod mapper;
pub mod tree;
pub mod types;

pub use locale::{LocaleContext, TranslatableField};
pub use types::*;
