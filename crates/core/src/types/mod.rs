//! Core types for the Shopify bridge.
//!
//! This module provides the resource shapes exchanged with the backend and
//! with the content platform.

pub mod id;
pub mod lookup;
pub mod resource;

pub use id::{ResourceType, UnknownResourceType, decode_gid, encode_gid};
pub use lookup::{LookupResult, LookupType, StorefrontUrl};
pub use resource::*;
