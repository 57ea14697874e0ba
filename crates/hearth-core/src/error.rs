// ── Engine error types ──
//
// Every failure inside the directive path lands here. These are NOT
// echoed verbatim to callers: the engine converts each variant into a
// well-formed error response via `response_message()`, and the internal
// cause stays in the logs. The `From<hearth_api::Error>` impl covers the
// call sites that don't map transport errors explicitly.

use thiserror::Error;

/// Unified error type for the directive engine.
#[derive(Debug, Error)]
pub enum BridgeError {
    // ── Identity / tokens ────────────────────────────────────────────
    /// Identity resolution failed (bad bearer token, no subject).
    #[error("authorization failed: {message}")]
    Auth { message: String },

    /// Token grant or refresh exchange failed. Never retried here.
    #[error("token exchange failed: {message}")]
    Token { message: String },

    // ── Data ─────────────────────────────────────────────────────────
    /// A capability or token record is missing.
    #[error("{entity} not found: {identifier}")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    /// The device behind an endpoint has never reported state.
    /// Callers on the state-report path treat this as "no known state".
    #[error("no reported state for endpoint {endpoint_id}")]
    Unavailable { endpoint_id: String },

    /// Malformed directive body (empty body, missing required field).
    #[error("invalid directive: {message}")]
    Validation { message: String },

    // ── Delivery ─────────────────────────────────────────────────────
    /// The event gateway rejected a delivery. Retry policy belongs to
    /// the caller issuing the directive, not to this engine.
    #[error("event delivery failed (HTTP {status}): {message}")]
    Delivery { status: u16, message: String },

    // ── Dispatch ─────────────────────────────────────────────────────
    /// A declared-but-unsupported directive (e.g. ModeController).
    #[error("not implemented: {namespace} {name}")]
    Unimplemented { namespace: String, name: String },

    /// A directive under no declared namespace.
    #[error("unhandled directive: {namespace} {name}")]
    Unhandled { namespace: String, name: String },

    // ── Infrastructure ───────────────────────────────────────────────
    /// A store backend failed (not "record absent" — that is `NotFound`).
    #[error("store error: {message}")]
    Store { message: String },

    /// HTTP transport failure talking to a collaborator.
    #[error("transport error: {message}")]
    Transport { message: String },
}

impl BridgeError {
    /// The protocol error type carried in the error response payload.
    ///
    /// The upstream protocol is given a single generic type for every
    /// failure; the distinction lives in the message and the logs.
    #[allow(clippy::unused_self)]
    pub fn response_type(&self) -> &'static str {
        "INTERNAL_ERROR"
    }

    /// The message carried in the error response payload.
    ///
    /// Validation messages are engine-constructed and safe to echo.
    /// Everything else is reduced to a terse category phrase so that
    /// internal causes (URLs, provider bodies) never leak onto the wire.
    pub fn response_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Unhandled { .. } => {
                "No response processed. Unhandled Directive.".to_string()
            }
            Self::Unimplemented { .. } => "Not Yet Implemented".to_string(),
            Self::Auth { .. } => "Bearer token could not be resolved".to_string(),
            Self::Token { .. } => "Authorization token exchange failed".to_string(),
            Self::NotFound { entity, .. } => format!("{entity} not found"),
            Self::Unavailable { .. } => "No reported state available".to_string(),
            Self::Delivery { .. } => "Event delivery failed".to_string(),
            Self::Store { .. } | Self::Transport { .. } => {
                "Internal service error".to_string()
            }
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hearth_api::Error> for BridgeError {
    fn from(err: hearth_api::Error) -> Self {
        match err {
            hearth_api::Error::Identity { message } => Self::Auth { message },
            hearth_api::Error::TokenExchange { error, description } => Self::Token {
                message: format!("{error}: {description}"),
            },
            hearth_api::Error::Delivery { status, message } => Self::Delivery { status, message },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}
