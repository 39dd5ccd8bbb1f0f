//! Storefront URL commands.

use shopify_bridge::{Bridge, BridgeError};
use shopify_bridge_core::ResourceType;

use super::{CommandError, print_json};

pub async fn lookup(bridge: &Bridge, url: &str) -> Result<(), CommandError> {
    let result = bridge.mapping().lookup_url(url).await?;
    print_json(&result)
}

pub async fn storefront_url(
    bridge: &Bridge,
    kind: &str,
    id: &str,
    lang: Option<&str>,
) -> Result<(), CommandError> {
    let kind = parse_kind(kind)?;
    let result = bridge.mapping().storefront_url(kind, id, lang).await?;
    print_json(&result)
}

fn parse_kind(kind: &str) -> Result<ResourceType, BridgeError> {
    kind.parse()
        .map_err(|e| BridgeError::Validation(format!("Invalid resource type: {e}")))
}
