// RangeController: SetRangeValue / AdjustRangeValue
//
// Owns the numeric policy: saturating clamps into the capability's
// configured `[minimum, maximum]`, precision as the default delta.
// Out-of-range requests succeed with the nearest legal value — they are
// never rejected.

use serde_json::Value;
use tracing::debug;

use crate::engine::DirectiveEngine;
use crate::error::BridgeError;
use crate::model::{ShadowMap, SupportedRange, shadow_key};
use crate::wire::{
    ContextProperty, Directive, RangeAdjustPayload, RangeSetPayload, Response,
};

impl DirectiveEngine {
    pub(crate) async fn handle_range(
        &self,
        directive: &Directive,
    ) -> Result<Response, BridgeError> {
        let endpoint_id = directive.endpoint_id()?;
        let token = directive.bearer_token()?;
        let correlation = directive.require_correlation_token()?;
        let instance = directive.require_instance()?;

        // Re-read the capability configuration to recover the bounds.
        let endpoint = self.capabilities().get(endpoint_id).await?;
        let capability = endpoint
            .instance_capability("Alexa.RangeController", instance)
            .ok_or_else(|| BridgeError::NotFound {
                entity: "range capability",
                identifier: format!("{endpoint_id}/{instance}"),
            })?;
        let range = capability
            .supported_range()
            .ok_or_else(|| BridgeError::NotFound {
                entity: "range configuration",
                identifier: format!("{endpoint_id}/{instance}"),
            })?;

        let key = shadow_key(Some(instance), "rangeValue");

        let requested = match directive.name() {
            "SetRangeValue" => {
                let payload: RangeSetPayload = directive.payload_as()?;
                payload.range_value
            }
            _ => {
                let payload: RangeAdjustPayload = directive.payload_as()?;
                // The caller signalling "use default delta" gave no
                // precision of their own; the capability's configured
                // precision is applied as the delta instead.
                let delta = if payload.range_value_delta_default {
                    range.precision
                } else {
                    payload.range_value_delta
                };

                // Base is the last *reported* value. This can lag the last
                // command until the device acks — an accepted lost-update
                // window. Missing or unreadable reported state reads as 0.
                let reported = match self.shadow().get_reported(endpoint_id).await {
                    Ok(map) => map,
                    Err(BridgeError::Unavailable { .. }) => ShadowMap::new(),
                    Err(other) => return Err(other),
                };
                let base = reported.get(&key).and_then(Value::as_f64).unwrap_or(0.0);
                debug!(endpoint_id, instance, base, delta, "adjusting range value");
                base + delta
            }
        };

        let value = clamp(requested, range);
        debug!(endpoint_id, instance, requested, value, "range directive");

        let mut patch = ShadowMap::new();
        patch.insert(key, range_number(value));
        self.shadow().set_desired(endpoint_id, patch).await?;

        Ok(Response::builder()
            .endpoint_id(endpoint_id)
            .scope_token(token)
            .correlation_token(Some(correlation))
            .context_property(Some(
                ContextProperty::new("Alexa.RangeController", "rangeValue", range_number(value))
                    .with_instance(instance),
            ))
            .build())
    }
}

/// Saturating clamp into `[minimum, maximum]` inclusive.
fn clamp(value: f64, range: &SupportedRange) -> f64 {
    value.min(range.maximum_value).max(range.minimum_value)
}

/// Integral results serialize as JSON integers so a clamp of `5` echoes
/// back as `5`, not `5.0`.
#[allow(clippy::cast_possible_truncation)]
fn range_number(value: f64) -> Value {
    #[allow(clippy::as_conversions)]
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
