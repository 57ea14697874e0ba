// ── Directive engine ──
//
// Stateless per request: one inbound directive is routed by
// (namespace, name) to its handling rule, processed synchronously
// end-to-end, and answered with exactly one response. The dispatch is
// an exhaustive match — there is no shared fallthrough response, so "no
// response produced" is unrepresentable. Handler implementations live
// in sibling files as inherent methods to keep this module focused on
// routing and the error boundary.

mod authorization;
mod discovery;
mod power;
mod range;
mod report_state;
mod toggle;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::{IdentityResolver, TokenLifecycle};
use crate::error::BridgeError;
use crate::store::{CapabilityStore, ShadowStore};
use crate::wire::{Directive, Response};

/// The directive dispatch and state-synchronization engine.
///
/// All collaborators are constructor-injected; the engine holds no
/// process-wide state and no locks. Concurrent directives for different
/// endpoints cannot interfere (all store keys are endpoint-scoped);
/// concurrent directives for the same endpoint race last-write-wins per
/// shadow key, which callers accept.
pub struct DirectiveEngine {
    capabilities: Arc<dyn CapabilityStore>,
    shadow: Arc<dyn ShadowStore>,
    identity: IdentityResolver,
    tokens: TokenLifecycle,
}

impl DirectiveEngine {
    pub fn new(
        capabilities: Arc<dyn CapabilityStore>,
        shadow: Arc<dyn ShadowStore>,
        identity: IdentityResolver,
        tokens: TokenLifecycle,
    ) -> Self {
        Self {
            capabilities,
            shadow,
            identity,
            tokens,
        }
    }

    /// Process one raw directive body into a response.
    ///
    /// This is the error boundary: every failure inside the directive
    /// path is converted into a protocol-well-formed error response
    /// here, with the internal cause logged but not echoed.
    pub async fn process(&self, body: &[u8]) -> Response {
        match self.dispatch(body).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "directive processing failed");
                Response::internal_error(&error)
            }
        }
    }

    async fn dispatch(&self, body: &[u8]) -> Result<Response, BridgeError> {
        let directive = Directive::parse(body)?;
        debug!(
            namespace = directive.namespace(),
            name = directive.name(),
            "dispatching directive"
        );

        match (directive.namespace(), directive.name()) {
            ("Alexa", "ReportState") => self.handle_report_state(&directive).await,
            ("Alexa.Discovery", "Discover") => self.handle_discovery(&directive).await,
            ("Alexa.Authorization", "AcceptGrant") => self.handle_accept_grant(&directive).await,
            ("Alexa.PowerController", "TurnOn" | "TurnOff") => self.handle_power(&directive).await,
            ("Alexa.ToggleController", "TurnOn" | "TurnOff") => {
                self.handle_toggle(&directive).await
            }
            ("Alexa.RangeController", "SetRangeValue" | "AdjustRangeValue") => {
                self.handle_range(&directive).await
            }

            // Declared namespaces with no implemented behavior answer with
            // an explicit "not implemented" — never a silent no-op. This
            // also covers unrecognized names under implemented namespaces.
            (
                namespace @ ("Alexa"
                | "Alexa.Discovery"
                | "Alexa.Authorization"
                | "Alexa.PowerController"
                | "Alexa.ToggleController"
                | "Alexa.RangeController"
                | "Alexa.ModeController"
                | "Alexa.Cooking"),
                name,
            ) => Err(BridgeError::Unimplemented {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),

            (namespace, name) => Err(BridgeError::Unhandled {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub(crate) fn capabilities(&self) -> &Arc<dyn CapabilityStore> {
        &self.capabilities
    }

    pub(crate) fn shadow(&self) -> &Arc<dyn ShadowStore> {
        &self.shadow
    }

    pub(crate) fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub(crate) fn tokens(&self) -> &TokenLifecycle {
        &self.tokens
    }
}
