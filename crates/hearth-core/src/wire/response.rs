// ── Response/event assembly ──
//
// Builder for protocol-conformant response and event envelopes:
// `{"context": {"properties": [...]}, "event": {"header", "endpoint"?, "payload"}}`.
// Optional fields (correlation token, scope, endpoint) are omitted from
// the wire entirely when absent — never serialized as null.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::BridgeError;
use crate::wire::property::ContextProperty;

const PAYLOAD_VERSION: &str = "3";

/// An assembled outbound response or event. Emitted once, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ResponseContext>,
    pub event: ResponseEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseContext {
    pub properties: Vec<ContextProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEvent {
    pub header: ResponseHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<ResponseEndpoint>,
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    pub namespace: String,
    pub name: String,
    pub message_id: String,
    pub payload_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<BearerScope>,
    pub endpoint_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerScope {
    #[serde(rename = "type")]
    pub scope_type: String,
    pub token: String,
}

impl Response {
    /// Start building a response with the default `Alexa::Response` header.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// The well-formed internal error response every engine failure is
    /// converted into at the directive boundary.
    pub fn internal_error(error: &BridgeError) -> Self {
        ResponseBuilder::new()
            .name("ErrorResponse")
            .payload(json!({
                "type": error.response_type(),
                "message": error.response_message(),
            }))
            .build()
    }

    /// Serialize to response bytes for the transport layer.
    pub fn to_bytes(&self) -> Vec<u8> {
        // A Response contains no non-serializable values by construction.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Builder for [`Response`].
///
/// Context properties are uniquely identified by (namespace, name,
/// instance); adding a second property with the same identity replaces
/// the first. Adding `None` is a no-op, which lets call sites decorate
/// a response conditionally without branching.
#[derive(Debug)]
pub struct ResponseBuilder {
    namespace: String,
    name: String,
    correlation_token: Option<String>,
    endpoint_id: Option<String>,
    scope_token: Option<String>,
    payload: Value,
    properties: Vec<ContextProperty>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self {
            namespace: "Alexa".to_string(),
            name: "Response".to_string(),
            correlation_token: None,
            endpoint_id: None,
            scope_token: None,
            payload: json!({}),
            properties: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the correlation token. `None` leaves the field off the wire.
    pub fn correlation_token(mut self, token: Option<impl Into<String>>) -> Self {
        self.correlation_token = token.map(Into::into);
        self
    }

    pub fn endpoint_id(mut self, endpoint_id: impl Into<String>) -> Self {
        self.endpoint_id = Some(endpoint_id.into());
        self
    }

    /// Bearer token echoed in the endpoint scope.
    pub fn scope_token(mut self, token: impl Into<String>) -> Self {
        self.scope_token = Some(token.into());
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Add a context property. `None` is a no-op: no crash, no empty
    /// property. A property with an identity already present replaces
    /// the earlier entry.
    pub fn context_property(mut self, property: Option<ContextProperty>) -> Self {
        if let Some(property) = property {
            if let Some(existing) = self
                .properties
                .iter_mut()
                .find(|p| p.key() == property.key())
            {
                *existing = property;
            } else {
                self.properties.push(property);
            }
        }
        self
    }

    pub fn build(self) -> Response {
        let context = if self.properties.is_empty() {
            None
        } else {
            Some(ResponseContext {
                properties: self.properties,
            })
        };

        let endpoint = self.endpoint_id.map(|endpoint_id| ResponseEndpoint {
            scope: self.scope_token.map(|token| BearerScope {
                scope_type: "BearerToken".to_string(),
                token,
            }),
            endpoint_id,
        });

        Response {
            context,
            event: ResponseEvent {
                header: ResponseHeader {
                    namespace: self.namespace,
                    name: self.name,
                    message_id: Uuid::new_v4().to_string(),
                    payload_version: PAYLOAD_VERSION.to_string(),
                    correlation_token: self.correlation_token,
                },
                endpoint,
                payload: self.payload,
            },
        }
    }
}
