// Identity (profile) lookup
//
// Resolves a bearer access token to the user profile behind it by calling
// the login provider's profile endpoint. The provider signals failure with
// an `{"error", "error_description"}` body, sometimes under HTTP 200, so
// both shapes are checked before deserializing the profile.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// The subject behind an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct ProviderError {
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for the login provider's profile endpoint.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    profile_url: Url,
}

impl IdentityClient {
    /// Create a new identity client.
    ///
    /// `profile_url` is the full profile endpoint
    /// (e.g. `https://api.amazon.com/user/profile`).
    pub fn new(profile_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, profile_url })
    }

    /// Create an identity client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, profile_url: Url) -> Self {
        Self { http, profile_url }
    }

    /// Look up the profile behind an access token.
    ///
    /// Fails with [`Error::Identity`] when the provider reports an error
    /// or the response carries no subject.
    pub async fn user_profile(&self, access_token: &str) -> Result<UserProfile, Error> {
        debug!(url = %self.profile_url, "profile lookup");

        let resp = self
            .http
            .get(self.profile_url.clone())
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        // The provider reports token errors in the body, not always via status.
        if let Ok(err) = serde_json::from_str::<ProviderError>(&body) {
            if let Some(error) = err.error {
                return Err(Error::Identity {
                    message: err.error_description.unwrap_or(error),
                });
            }
        }

        if !status.is_success() {
            return Err(Error::Identity {
                message: format!("profile lookup failed (HTTP {status})"),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
