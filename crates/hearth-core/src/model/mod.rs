// ── Domain model ──
//
// Canonical types for the directive bridge: endpoints and their declared
// capabilities, the per-endpoint shadow document, and the per-user token
// record. Wire-facing structs serialize camelCase to match the protocol.

mod endpoint;
mod shadow;
mod token;

pub use endpoint::{
    Capability, CapabilityConfiguration, CapabilityProperties, DiscoveryRecord, Endpoint, SkuKind,
    SupportedProperty, SupportedRange,
};
pub(crate) use endpoint::default_property_value;
pub use shadow::{ShadowDocument, ShadowMap, ShadowState, shadow_key};
pub use token::UserToken;
