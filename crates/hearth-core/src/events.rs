// ── Event publishing ──
//
// Transposes endpoint-cloud events (add/update, physical change, delete)
// into assistant gateway events. Every delivery resolves a valid access
// token through the token lifecycle first, so refresh is transparent to
// callers. Delivery failures surface as `Delivery` errors and are not
// retried here — retry policy belongs to the caller.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info};

use hearth_api::{DeliveryReceipt, GatewayClient};

use crate::auth::{DEV_USER_ID, TokenLifecycle};
use crate::error::BridgeError;
use crate::model::{Capability, ShadowMap, SkuKind, shadow_key};
use crate::store::ShadowStore;
use crate::wire::{ContextProperty, Response};

/// Manufacturer reported for endpoints whose SKU carries no better data.
const DEFAULT_MANUFACTURER: &str = "Sample Manufacturer";

/// An endpoint-cloud event awaiting transposition upstream.
#[derive(Debug, Clone)]
pub enum EndpointEvent {
    /// An endpoint was created or updated; the assistant must
    /// (re-)discover it.
    AddOrUpdate {
        user_id: String,
        endpoint_id: String,
        friendly_name: String,
        sku: String,
        capabilities: Vec<Capability>,
    },
    /// The physical device changed state on its own.
    Change {
        user_id: String,
        endpoint_id: String,
        namespace: String,
        property: String,
        instance: Option<String>,
        value: Value,
    },
    /// An endpoint was removed.
    Delete {
        user_id: String,
        endpoint_id: String,
    },
}

/// Pushes asynchronous change/discovery events upstream.
pub struct EventPublisher {
    gateway: GatewayClient,
    tokens: TokenLifecycle,
    shadow: Arc<dyn ShadowStore>,
}

impl EventPublisher {
    pub fn new(
        gateway: GatewayClient,
        tokens: TokenLifecycle,
        shadow: Arc<dyn ShadowStore>,
    ) -> Self {
        Self {
            gateway,
            tokens,
            shadow,
        }
    }

    /// Transpose and deliver one endpoint-cloud event.
    ///
    /// Returns `Ok(None)` when the event is deliberately not sent
    /// (change events for the development user). A discovery add/delete
    /// event carries its endpoint reference in the payload and omits the
    /// envelope endpoint; a change report keeps the envelope endpoint
    /// and carries only the property list.
    pub async fn publish(
        &self,
        event: EndpointEvent,
    ) -> Result<Option<DeliveryReceipt>, BridgeError> {
        match event {
            EndpointEvent::AddOrUpdate {
                user_id,
                endpoint_id,
                friendly_name,
                sku,
                capabilities,
            } => {
                let token = self.tokens.valid_access_token(&user_id).await?;
                let kind = SkuKind::from_sku(&sku);

                let payload = json!({
                    "endpoints": [{
                        "endpointId": endpoint_id,
                        "friendlyName": friendly_name,
                        "description": kind.description(),
                        "manufacturerName": DEFAULT_MANUFACTURER,
                        "displayCategories": kind.display_categories(),
                        "capabilities": capabilities,
                    }],
                    "scope": {"type": "BearerToken", "token": token},
                });

                let receipt = self
                    .send("Alexa.Discovery", "AddOrUpdateReport", None, &token, payload)
                    .await?;
                Ok(Some(receipt))
            }

            EndpointEvent::Change {
                user_id,
                endpoint_id,
                namespace,
                property,
                instance,
                value,
            } => {
                // The device already changed; record it in the desired view
                // so shadows converge even when no event goes out.
                let key = shadow_key(instance.as_deref(), &property);
                let mut patch = ShadowMap::new();
                patch.insert(key, value.clone());
                self.shadow.set_desired(&endpoint_id, patch).await?;

                if user_id == DEV_USER_ID {
                    debug!(endpoint_id, "change event not sent for development user");
                    return Ok(None);
                }

                let token = self.tokens.valid_access_token(&user_id).await?;

                let mut context_property = ContextProperty::new(namespace, property, value);
                if let Some(instance) = instance {
                    context_property = context_property.with_instance(instance);
                }

                let payload = json!({
                    "change": {
                        "cause": {"type": "PHYSICAL_INTERACTION"},
                        "properties": [context_property],
                    }
                });

                let receipt = self
                    .send("Alexa", "ChangeReport", Some(&endpoint_id), &token, payload)
                    .await?;
                Ok(Some(receipt))
            }

            EndpointEvent::Delete {
                user_id,
                endpoint_id,
            } => {
                let token = self.tokens.valid_access_token(&user_id).await?;

                let payload = json!({
                    "endpoints": [{"endpointId": endpoint_id}],
                    "scope": {"type": "BearerToken", "token": token},
                });

                let receipt = self
                    .send("Alexa.Discovery", "DeleteReport", None, &token, payload)
                    .await?;
                Ok(Some(receipt))
            }
        }
    }

    /// Build the envelope and deliver it. `endpoint_id` controls whether
    /// the envelope carries an endpoint object — only change reports do.
    async fn send(
        &self,
        namespace: &str,
        name: &str,
        endpoint_id: Option<&str>,
        token: &str,
        payload: Value,
    ) -> Result<DeliveryReceipt, BridgeError> {
        let mut builder = Response::builder()
            .namespace(namespace)
            .name(name)
            .payload(payload);
        if let Some(endpoint_id) = endpoint_id {
            builder = builder.endpoint_id(endpoint_id).scope_token(token);
        }
        let event = builder.build();

        info!(namespace, name, "publishing event");
        let receipt = self.gateway.post_event(token, &event).await?;
        Ok(receipt)
    }
}
