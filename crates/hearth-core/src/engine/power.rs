// PowerController: TurnOn / TurnOff

use serde_json::{Value, json};
use tracing::debug;

use crate::engine::DirectiveEngine;
use crate::error::BridgeError;
use crate::model::ShadowMap;
use crate::wire::{ContextProperty, Directive, Response};

impl DirectiveEngine {
    /// Map the directive name to a power state, write it into the
    /// shadow's desired view, and echo it back as a context property.
    ///
    /// A shadow-write failure propagates into an error response — a
    /// control directive never reports success it did not commit. The
    /// correlation token is optional for power directives.
    pub(crate) async fn handle_power(
        &self,
        directive: &Directive,
    ) -> Result<Response, BridgeError> {
        let endpoint_id = directive.endpoint_id()?;
        let token = directive.bearer_token()?;

        let user_id = self.identity().resolve(token).await?;
        debug!(user_id, endpoint_id, name = directive.name(), "power directive");

        let value = if directive.name() == "TurnOff" { "OFF" } else { "ON" };

        let mut patch = ShadowMap::new();
        patch.insert("powerState".to_string(), Value::from(value));
        self.shadow().set_desired(endpoint_id, patch).await?;

        Ok(Response::builder()
            .endpoint_id(endpoint_id)
            .scope_token(token)
            .correlation_token(directive.correlation_token())
            .context_property(Some(ContextProperty::new(
                "Alexa.PowerController",
                "powerState",
                json!(value),
            )))
            .context_property(None)
            .build())
    }
}
