// ── Endpoint and capability model ──
//
// An `Endpoint` is the virtual representation of one controllable device:
// identity, owner, display metadata, SKU, and the list of declared
// controller capabilities. Capabilities carry the numeric configuration
// (range bounds, precision) the directive handlers need to clamp values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::shadow::shadow_key;

/// A virtual device record, owned by the capability store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Globally unique endpoint identifier.
    pub endpoint_id: String,
    /// Owning user identifier.
    pub user_id: String,
    pub friendly_name: String,
    pub manufacturer_name: String,
    pub description: String,
    pub display_categories: Vec<String>,
    /// Device SKU (e.g. `SW01` for a switch). Drives default display
    /// metadata on discovery events — see [`SkuKind`].
    pub sku: String,
    pub capabilities: Vec<Capability>,
}

impl Endpoint {
    /// Capabilities whose properties are declared retrievable,
    /// in declaration order. State reports must be total over these.
    pub fn retrievable_capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter().filter(|c| c.is_retrievable())
    }

    /// The capability for `interface` on a given instance, if declared.
    pub fn instance_capability(&self, interface: &str, instance: &str) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|c| c.interface == interface && c.instance.as_deref() == Some(instance))
    }

    /// The discovery record emitted for this endpoint in a
    /// `Discover.Response` payload.
    pub fn discovery_record(&self) -> DiscoveryRecord {
        DiscoveryRecord {
            endpoint_id: self.endpoint_id.clone(),
            friendly_name: self.friendly_name.clone(),
            description: self.description.clone(),
            manufacturer_name: self.manufacturer_name.clone(),
            display_categories: self.display_categories.clone(),
            capabilities: self.capabilities.clone(),
        }
    }
}

/// One declared controller interface on an endpoint.
///
/// Immutable once discovered except via explicit endpoint update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    #[serde(rename = "type", default = "default_capability_type")]
    pub capability_type: String,
    /// The controller family, e.g. `Alexa.RangeController`.
    pub interface: String,
    /// Distinguishes multiple controllers of the same family on one
    /// endpoint. Mandatory for toggle and range controllers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default = "default_capability_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<CapabilityProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<CapabilityConfiguration>,
}

fn default_capability_type() -> String {
    "AlexaInterface".to_string()
}

fn default_capability_version() -> String {
    "3".to_string()
}

impl Capability {
    /// Whether this capability's properties can be queried by a state report.
    pub fn is_retrievable(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| p.retrievable)
    }

    /// The first supported property name, if any. The protocol's
    /// capability objects list exactly one property per controller.
    pub fn primary_property(&self) -> Option<&str> {
        self.properties
            .as_ref()?
            .supported
            .first()
            .map(|p| p.name.as_str())
    }

    /// The shadow key this capability's primary property is stored under:
    /// `<instance>.<property>` when an instance exists, bare otherwise.
    ///
    /// Toggle state is the one exception: it is stored under
    /// `<instance>.state` even though the wire property is `toggleState`,
    /// so readers and the toggle control handler must derive the same key.
    pub fn shadow_key(&self) -> Option<String> {
        let property = match self.interface.as_str() {
            "Alexa.ToggleController" => "state",
            _ => self.primary_property()?,
        };
        Some(shadow_key(self.instance.as_deref(), property))
    }

    /// The numeric range configuration, for range-style controllers.
    pub fn supported_range(&self) -> Option<&SupportedRange> {
        self.configuration.as_ref()?.supported_range.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProperties {
    #[serde(default)]
    pub supported: Vec<SupportedProperty>,
    #[serde(default)]
    pub proactively_reported: bool,
    #[serde(default)]
    pub retrievable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedProperty {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_range: Option<SupportedRange>,
}

/// Minimum/maximum/precision for a range controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedRange {
    pub minimum_value: f64,
    pub maximum_value: f64,
    pub precision: f64,
}

/// The wire form of one endpoint in a `Discover.Response` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRecord {
    pub endpoint_id: String,
    pub friendly_name: String,
    pub description: String,
    pub manufacturer_name: String,
    pub display_categories: Vec<String>,
    pub capabilities: Vec<Capability>,
}

// ── Per-namespace state defaults ────────────────────────────────────

/// The value substituted for a retrievable property the device has never
/// reported. State reports must be total over declared retrievable
/// properties; namespaces without a documented default report JSON null.
pub(crate) fn default_property_value(interface: &str) -> Value {
    match interface {
        "Alexa.PowerController" | "Alexa.ToggleController" => Value::String("OFF".to_string()),
        "Alexa.RangeController" => Value::from(1),
        _ => Value::Null,
    }
}

// ── SKU classification ──────────────────────────────────────────────

/// Device kind derived from a SKU prefix. Supplies the default
/// description and display categories for discovery events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkuKind {
    Light,
    Microwave,
    Switch,
    Toaster,
    Other,
}

impl SkuKind {
    /// Classify a SKU by its (case-insensitive) two-letter prefix.
    pub fn from_sku(sku: &str) -> Self {
        let prefix: String = sku.chars().take(2).collect::<String>().to_uppercase();
        match prefix.as_str() {
            "LI" => Self::Light,
            "MW" => Self::Microwave,
            "SW" => Self::Switch,
            "TT" => Self::Toaster,
            _ => Self::Other,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Light => "A sample light endpoint",
            Self::Microwave => "A sample microwave endpoint",
            Self::Switch => "A sample switch endpoint",
            Self::Toaster => "A sample toaster endpoint",
            Self::Other => "A sample endpoint",
        }
    }

    pub fn display_categories(self) -> Vec<String> {
        let category = match self {
            Self::Light => "LIGHT",
            Self::Microwave => "MICROWAVE",
            Self::Switch => "SWITCH",
            Self::Toaster | Self::Other => "OTHER",
        };
        vec![category.to_string()]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;
    use serde_json::json;

    #[test]
    fn capability_wire_shape_round_trips() {
        let wire = json!({
            "type": "AlexaInterface",
            "interface": "Alexa.RangeController",
            "instance": "Fan.Speed",
            "version": "3",
            "properties": {
                "supported": [{"name": "rangeValue"}],
                "proactivelyReported": true,
                "retrievable": true
            },
            "configuration": {
                "supportedRange": {"minimumValue": 1.0, "maximumValue": 6.0, "precision": 1.0}
            }
        });

        let cap: Capability = serde_json::from_value(wire).unwrap();
        assert!(cap.is_retrievable());
        assert_eq!(cap.primary_property(), Some("rangeValue"));
        assert_eq!(cap.shadow_key().as_deref(), Some("Fan.Speed.rangeValue"));

        let range = cap.supported_range().unwrap();
        assert_eq!(range.minimum_value, 1.0);
        assert_eq!(range.maximum_value, 6.0);
        assert_eq!(range.precision, 1.0);
    }

    #[test]
    fn capability_without_instance_uses_bare_key() {
        let cap: Capability = serde_json::from_value(json!({
            "interface": "Alexa.PowerController",
            "properties": {"supported": [{"name": "powerState"}], "retrievable": true}
        }))
        .unwrap();

        assert_eq!(cap.shadow_key().as_deref(), Some("powerState"));
    }

    #[test]
    fn sku_prefixes_classify() {
        assert_eq!(SkuKind::from_sku("LI00"), SkuKind::Light);
        assert_eq!(SkuKind::from_sku("mw03"), SkuKind::Microwave);
        assert_eq!(SkuKind::from_sku("SW01"), SkuKind::Switch);
        assert_eq!(SkuKind::from_sku("TT09"), SkuKind::Toaster);
        assert_eq!(SkuKind::from_sku("OT00"), SkuKind::Other);
        assert_eq!(SkuKind::from_sku(""), SkuKind::Other);
    }

    #[test]
    fn defaults_per_namespace() {
        assert_eq!(default_property_value("Alexa.PowerController"), json!("OFF"));
        assert_eq!(default_property_value("Alexa.ToggleController"), json!("OFF"));
        assert_eq!(default_property_value("Alexa.RangeController"), json!(1));
        assert_eq!(default_property_value("Alexa.Speaker"), Value::Null);
    }
}
