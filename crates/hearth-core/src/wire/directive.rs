// ── Inbound directive parsing ──
//
// One `Directive` per inbound request, parsed from
// `{"directive": {"header", "endpoint"?, "payload"}}`. Accessors return
// `Validation` errors for fields a handler requires but the body omits,
// so handlers never index into raw JSON.

use serde::Deserialize;
use serde_json::Value;

use crate::error::BridgeError;

#[derive(Debug, Deserialize)]
struct DirectiveEnvelope {
    directive: Directive,
}

/// An inbound command addressed to one endpoint. Transient: constructed
/// per request, never persisted.
#[derive(Debug, Deserialize)]
pub struct Directive {
    header: DirectiveHeader,
    #[serde(default)]
    endpoint: Option<DirectiveEndpoint>,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectiveHeader {
    namespace: String,
    name: String,
    #[serde(default)]
    correlation_token: Option<String>,
    #[serde(default)]
    instance: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectiveEndpoint {
    endpoint_id: String,
    #[serde(default)]
    scope: Option<BearerScope>,
}

#[derive(Debug, Deserialize)]
struct BearerScope {
    token: String,
}

impl Directive {
    /// Parse a raw request body.
    ///
    /// An empty (or whitespace-only) body is a distinct validation
    /// failure from malformed JSON; both surface as internal-error
    /// responses at the engine boundary.
    pub fn parse(body: &[u8]) -> Result<Self, BridgeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(BridgeError::Validation {
                message: "Empty Body".to_string(),
            });
        }

        let envelope: DirectiveEnvelope =
            serde_json::from_slice(body).map_err(|e| BridgeError::Validation {
                message: format!("malformed directive: {e}"),
            })?;
        Ok(envelope.directive)
    }

    pub fn namespace(&self) -> &str {
        &self.header.namespace
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Correlation token, where present. Optional for power directives,
    /// required (via [`require_correlation_token`](Self::require_correlation_token))
    /// elsewhere.
    pub fn correlation_token(&self) -> Option<&str> {
        self.header.correlation_token.as_deref()
    }

    pub fn require_correlation_token(&self) -> Result<&str, BridgeError> {
        self.header
            .correlation_token
            .as_deref()
            .ok_or_else(|| self.missing("header.correlationToken"))
    }

    pub fn instance(&self) -> Option<&str> {
        self.header.instance.as_deref()
    }

    pub fn require_instance(&self) -> Result<&str, BridgeError> {
        self.header
            .instance
            .as_deref()
            .ok_or_else(|| self.missing("header.instance"))
    }

    pub fn endpoint_id(&self) -> Result<&str, BridgeError> {
        self.endpoint
            .as_ref()
            .map(|e| e.endpoint_id.as_str())
            .ok_or_else(|| self.missing("endpoint.endpointId"))
    }

    /// The caller's bearer token from the endpoint scope.
    pub fn bearer_token(&self) -> Result<&str, BridgeError> {
        self.endpoint
            .as_ref()
            .and_then(|e| e.scope.as_ref())
            .map(|s| s.token.as_str())
            .ok_or_else(|| self.missing("endpoint.scope.token"))
    }

    /// Deserialize the namespace-specific payload.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, BridgeError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| BridgeError::Validation {
            message: format!(
                "invalid {} {} payload: {e}",
                self.header.namespace, self.header.name
            ),
        })
    }

    fn missing(&self, field: &str) -> BridgeError {
        BridgeError::Validation {
            message: format!(
                "{} {} directive missing {field}",
                self.header.namespace, self.header.name
            ),
        }
    }
}

// ── Namespace-specific payloads ─────────────────────────────────────

/// `Discover` carries the bearer token in the payload scope, not on an
/// endpoint.
#[derive(Debug, Deserialize)]
pub struct DiscoveryScopePayload {
    pub scope: ScopeToken,
}

#[derive(Debug, Deserialize)]
pub struct ScopeToken {
    pub token: String,
}

/// `Authorization.AcceptGrant` payload.
#[derive(Debug, Deserialize)]
pub struct GrantPayload {
    pub grant: GrantCode,
    pub grantee: GranteeToken,
}

#[derive(Debug, Deserialize)]
pub struct GrantCode {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct GranteeToken {
    pub token: String,
}

/// `RangeController.SetRangeValue` payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSetPayload {
    pub range_value: f64,
}

/// `RangeController.AdjustRangeValue` payload. When
/// `range_value_delta_default` is set the caller gave no precision and
/// the capability's configured precision is applied as the delta.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeAdjustPayload {
    pub range_value_delta: f64,
    #[serde(default)]
    pub range_value_delta_default: bool,
}
