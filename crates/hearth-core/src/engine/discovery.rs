// Discovery: enumerate a user's endpoints

use serde_json::json;
use tracing::info;

use crate::engine::DirectiveEngine;
use crate::error::BridgeError;
use crate::model::{DiscoveryRecord, Endpoint};
use crate::wire::{Directive, DiscoveryScopePayload, Response};

impl DirectiveEngine {
    /// Emit one `Discover.Response` event listing every endpoint the
    /// caller owns — an empty list when they own none, never an error.
    ///
    /// The bearer token arrives in the payload scope (not on an
    /// endpoint); identity resolution honors the development bypass.
    pub(crate) async fn handle_discovery(
        &self,
        directive: &Directive,
    ) -> Result<Response, BridgeError> {
        let payload: DiscoveryScopePayload = directive.payload_as()?;
        let user_id = self.identity().resolve(&payload.scope.token).await?;

        let endpoints = self.capabilities().list_by_user(&user_id).await?;
        info!(user_id, count = endpoints.len(), "discovery");

        let records: Vec<DiscoveryRecord> =
            endpoints.iter().map(Endpoint::discovery_record).collect();

        Ok(Response::builder()
            .namespace("Alexa.Discovery")
            .name("Discover.Response")
            .payload(json!({ "endpoints": records }))
            .build())
    }
}
