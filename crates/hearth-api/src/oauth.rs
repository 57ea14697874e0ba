// OAuth token exchange
//
// Form-encoded POSTs against the login provider's token endpoint.
// Two grant flows: authorization-code (initial AcceptGrant) and
// refresh-token (transparent renewal). Neither flow retries — retry
// policy belongs to the caller, and a failed refresh must surface as
// an authorization failure, not a loop.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// A successful token grant from the provider.
///
/// Both flows return the same shape; `expires_in` is the access token
/// lifetime in seconds from the moment of the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: SecretString,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Deserialize)]
struct TokenEndpointError {
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for the login provider's token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    token_url: Url,
}

impl OAuthClient {
    /// Create a new OAuth client.
    ///
    /// `token_url` is the full token endpoint
    /// (e.g. `https://api.amazon.com/auth/o2/token`).
    pub fn new(token_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, token_url })
    }

    /// Create an OAuth client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, token_url: Url) -> Self {
        Self { http, token_url }
    }

    /// Exchange an authorization grant code for an access/refresh pair.
    pub async fn exchange_grant_code(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &SecretString,
        redirect_uri: &str,
    ) -> Result<TokenGrant, Error> {
        debug!(url = %self.token_url, "exchanging authorization code");

        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
            ("redirect_uri", redirect_uri),
        ];
        self.exchange(&form).await
    }

    /// Exchange a refresh token for a fresh access/refresh pair.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &SecretString,
        client_id: &str,
        client_secret: &SecretString,
        redirect_uri: &str,
    ) -> Result<TokenGrant, Error> {
        debug!(url = %self.token_url, "refreshing access token");

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
            ("redirect_uri", redirect_uri),
        ];
        self.exchange(&form).await
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenGrant, Error> {
        let resp = self
            .http
            .post(self.token_url.clone())
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        // The provider reports grant errors in the body, sometimes with HTTP 200.
        if let Ok(err) = serde_json::from_str::<TokenEndpointError>(&body) {
            if let Some(error) = err.error {
                return Err(Error::TokenExchange {
                    error,
                    description: err.error_description.unwrap_or_default(),
                });
            }
        }

        if !status.is_success() {
            return Err(Error::TokenExchange {
                error: format!("http_{}", status.as_u16()),
                description: format!("token endpoint returned HTTP {status}"),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
