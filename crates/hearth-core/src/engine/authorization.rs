// Authorization: AcceptGrant

use tracing::info;

use crate::engine::DirectiveEngine;
use crate::error::BridgeError;
use crate::wire::{Directive, GrantPayload, Response};

impl DirectiveEngine {
    /// Resolve the grantee, exchange the grant code for an
    /// access/refresh pair, and persist the user's token record.
    ///
    /// Failures at any step propagate before the store is touched, so a
    /// failed grant leaves no partial token row behind. The acceptance
    /// response carries an empty payload.
    pub(crate) async fn handle_accept_grant(
        &self,
        directive: &Directive,
    ) -> Result<Response, BridgeError> {
        let payload: GrantPayload = directive.payload_as()?;

        let user_id = self.identity().resolve(&payload.grantee.token).await?;
        self.tokens()
            .store_grant(&user_id, &payload.grant.code, &payload.grantee.token)
            .await?;

        info!(user_id, "accepted authorization grant");

        Ok(Response::builder()
            .namespace("Alexa.Authorization")
            .name("AcceptGrant.Response")
            .build())
    }
}
