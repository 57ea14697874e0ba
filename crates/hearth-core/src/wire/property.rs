// ── Context properties ──

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One namespace/name/value tuple describing current device state,
/// reported back to the caller in a response's `context.properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextProperty {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub value: Value,
    /// ISO 8601 UTC timestamp of the sample.
    pub time_of_sample: String,
    pub uncertainty_in_milliseconds: u64,
}

impl ContextProperty {
    /// A property sampled now, with zero stated uncertainty.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            instance: None,
            value,
            time_of_sample: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uncertainty_in_milliseconds: 0,
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// The (namespace, name, instance) identity used for dedup within
    /// one response.
    pub(crate) fn key(&self) -> (&str, &str, Option<&str>) {
        (
            self.namespace.as_str(),
            self.name.as_str(),
            self.instance.as_deref(),
        )
    }
}
