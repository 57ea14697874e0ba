// ── Shadow document model ──
//
// The per-endpoint state document synchronized with the physical device.
// `desired` holds the last commanded values, `reported` the last values
// the device confirmed; the two may diverge until the device acks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat property map inside a shadow view. Keys are bare property names
/// or `<instance>.<property>`.
pub type ShadowMap = serde_json::Map<String, Value>;

/// The persisted/exchanged shadow document:
/// `{"state": {"desired": {...}, "reported": {...}}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShadowDocument {
    #[serde(default)]
    pub state: ShadowState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShadowState {
    #[serde(default)]
    pub desired: ShadowMap,
    #[serde(default)]
    pub reported: ShadowMap,
}

/// The single key-derivation rule shared by every reader and writer:
/// `<instance>.<property>` when an instance exists, the bare property
/// name otherwise. A key written by a control directive must be
/// re-readable by a later state report through this same function.
pub fn shadow_key(instance: Option<&str>, property: &str) -> String {
    match instance {
        Some(instance) => format!("{instance}.{property}"),
        None => property.to_string(),
    }
}
