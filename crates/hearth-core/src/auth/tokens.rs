// ── Token lifecycle ──
//
// Tracks per-user access/refresh tokens against their absolute
// expiration and refreshes transparently when a token is stale or about
// to be. Exactly one refresh attempt per call: a failed exchange
// propagates as an authorization failure, never a retry loop.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use hearth_api::OAuthClient;

use crate::auth::ClientCredentials;
use crate::error::BridgeError;
use crate::model::UserToken;
use crate::store::TokenStore;

/// Per-user token management over a [`TokenStore`].
#[derive(Clone)]
pub struct TokenLifecycle {
    store: Arc<dyn TokenStore>,
    oauth: OAuthClient,
    credentials: ClientCredentials,
}

impl TokenLifecycle {
    pub fn new(
        store: Arc<dyn TokenStore>,
        oauth: OAuthClient,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            store,
            oauth,
            credentials,
        }
    }

    /// A currently-valid access token for the user, refreshing first if
    /// the stored one is expired or inside the 30 s lookahead window.
    ///
    /// The refreshed record is persisted (access + refresh + type +
    /// expiration in one put) before the token is returned.
    pub async fn valid_access_token(&self, user_id: &str) -> Result<String, BridgeError> {
        let token = self.store.get(user_id).await?;

        if !token.is_expired(Utc::now()) {
            debug!(user_id, "stored access token still valid");
            return Ok(token.access_token);
        }

        info!(user_id, "access token expired, refreshing");
        let grant = self
            .oauth
            .refresh_access_token(
                &token.refresh_token,
                &token.client_id,
                &token.client_secret,
                &token.redirect_uri,
            )
            .await
            .map_err(|e| BridgeError::Token {
                message: e.to_string(),
            })?;

        let mut refreshed = token;
        refreshed.apply_refresh(&grant, Utc::now());
        self.store.put(refreshed.clone()).await?;

        Ok(refreshed.access_token)
    }

    /// Exchange an authorization grant code and persist the resulting
    /// token record. Nothing is written when the exchange fails.
    pub async fn store_grant(
        &self,
        user_id: &str,
        grant_code: &str,
        grantee_token: &str,
    ) -> Result<UserToken, BridgeError> {
        debug!(user_id, "exchanging authorization grant code");
        let grant = self
            .oauth
            .exchange_grant_code(
                grant_code,
                &self.credentials.client_id,
                &self.credentials.client_secret,
                &self.credentials.redirect_uri,
            )
            .await
            .map_err(|e| BridgeError::Token {
                message: e.to_string(),
            })?;

        let mut token = UserToken::from_grant(user_id, &grant, &self.credentials, Utc::now());
        token.grant_code = Some(grant_code.to_string());
        token.grantee_token = Some(grantee_token.to_string());

        self.store.put(token.clone()).await?;
        info!(user_id, "stored authorization grant");
        Ok(token)
    }
}
