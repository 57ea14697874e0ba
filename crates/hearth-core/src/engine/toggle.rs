// ToggleController: TurnOn / TurnOff on a named instance

use serde_json::{Value, json};
use tracing::debug;

use crate::engine::DirectiveEngine;
use crate::error::BridgeError;
use crate::model::{ShadowMap, shadow_key};
use crate::wire::{ContextProperty, Directive, Response};

impl DirectiveEngine {
    /// Same pattern as the power handler, but instance-scoped: the
    /// shadow key is `<instance>.state` and the reported property is
    /// `toggleState`. Instance and correlation token are mandatory.
    pub(crate) async fn handle_toggle(
        &self,
        directive: &Directive,
    ) -> Result<Response, BridgeError> {
        let endpoint_id = directive.endpoint_id()?;
        let token = directive.bearer_token()?;
        let correlation = directive.require_correlation_token()?;
        let instance = directive.require_instance()?;

        debug!(endpoint_id, instance, name = directive.name(), "toggle directive");

        let value = if directive.name() == "TurnOff" { "OFF" } else { "ON" };

        let mut patch = ShadowMap::new();
        patch.insert(shadow_key(Some(instance), "state"), Value::from(value));
        self.shadow().set_desired(endpoint_id, patch).await?;

        Ok(Response::builder()
            .endpoint_id(endpoint_id)
            .scope_token(token)
            .correlation_token(Some(correlation))
            .context_property(Some(
                ContextProperty::new("Alexa.ToggleController", "toggleState", json!(value))
                    .with_instance(instance),
            ))
            .build())
    }
}
