// ReportState: total state reports over declared retrievable properties

use tracing::debug;

use crate::engine::DirectiveEngine;
use crate::error::BridgeError;
use crate::model::{ShadowMap, default_property_value};
use crate::wire::{ContextProperty, Directive, Response};

impl DirectiveEngine {
    /// Emit a `StateReport` with exactly one context property per
    /// capability declared retrievable.
    ///
    /// The report must be total: a retrievable property the device has
    /// never reported gets its namespace's default value (`OFF` for
    /// power and toggle, `1` for a range) rather than being omitted.
    /// A shadow that has never reported at all reads as "no known
    /// state", not as a failure.
    pub(crate) async fn handle_report_state(
        &self,
        directive: &Directive,
    ) -> Result<Response, BridgeError> {
        let endpoint_id = directive.endpoint_id()?;
        let token = directive.bearer_token()?;
        let correlation = directive.require_correlation_token()?;

        let user_id = self.identity().resolve(token).await?;

        let endpoint = self.capabilities().get(endpoint_id).await?;
        let reported = match self.shadow().get_reported(endpoint_id).await {
            Ok(map) => map,
            Err(BridgeError::Unavailable { .. }) => ShadowMap::new(),
            Err(other) => return Err(other),
        };

        debug!(user_id, endpoint_id, "sending state report");

        let mut builder = Response::builder()
            .name("StateReport")
            .endpoint_id(endpoint_id)
            .scope_token(token)
            .correlation_token(Some(correlation));

        for capability in endpoint.retrievable_capabilities() {
            let Some(property) = capability.primary_property() else {
                continue;
            };
            let Some(key) = capability.shadow_key() else {
                continue;
            };

            let value = reported
                .get(&key)
                .cloned()
                .unwrap_or_else(|| default_property_value(&capability.interface));

            let mut context_property =
                ContextProperty::new(capability.interface.clone(), property, value);
            if let Some(instance) = &capability.instance {
                context_property = context_property.with_instance(instance.clone());
            }
            builder = builder.context_property(Some(context_property));
        }

        Ok(builder.build())
    }
}
