// ── Identity resolution ──
//
// Turns a bearer token into a user identifier via the profile endpoint.
// A fixed development placeholder token short-circuits to a reserved
// user id without a lookup, but only when the `dev_bypass` flag is set —
// the bypass must never be reachable in a production configuration.

use tracing::{debug, warn};

use hearth_api::IdentityClient;

use crate::error::BridgeError;

/// The placeholder bearer token the assistant's sample requests carry.
/// With `dev_bypass` enabled it maps to [`DEV_USER_ID`] with no lookup.
pub const DEV_BYPASS_TOKEN: &str = "access-token-from-skill";

/// Reserved user id for the development bypass. Change events for this
/// user are never pushed upstream.
pub const DEV_USER_ID: &str = "0";

/// Resolves bearer tokens to user identifiers.
pub struct IdentityResolver {
    client: IdentityClient,
    dev_bypass: bool,
}

impl IdentityResolver {
    pub fn new(client: IdentityClient, dev_bypass: bool) -> Self {
        Self { client, dev_bypass }
    }

    /// Resolve a bearer token to the user id behind it.
    ///
    /// Fails with [`BridgeError::Auth`] when the upstream lookup errors
    /// or returns no subject.
    pub async fn resolve(&self, bearer_token: &str) -> Result<String, BridgeError> {
        if self.dev_bypass && bearer_token == DEV_BYPASS_TOKEN {
            warn!("development bypass token presented, using user id {DEV_USER_ID}");
            return Ok(DEV_USER_ID.to_string());
        }

        let profile = self.client.user_profile(bearer_token).await?;
        debug!(user_id = %profile.user_id, "resolved bearer token");
        Ok(profile.user_id)
    }
}
