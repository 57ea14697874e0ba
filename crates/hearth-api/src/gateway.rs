// Event gateway delivery
//
// Authenticated HTTPS POSTs to the assistant's event gateway
// (`POST {base}/v3/events` with a bearer token). One shot per call:
// a rejected delivery is returned to the caller as `Error::Delivery`
// and never retried here.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const EVENTS_PATH: &str = "/v3/events";

/// Outcome of an accepted event delivery.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// HTTP status returned by the gateway (202 on acceptance).
    pub status: u16,
}

/// Client for the assistant event gateway.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// `base_url` is the regional gateway root
    /// (e.g. `https://api.amazonalexa.com`; EU and FE regions differ).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a gateway client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Deliver one event envelope to the gateway.
    ///
    /// `access_token` must already be valid — token refresh is the
    /// caller's concern (see `hearth-core`'s `EventPublisher`).
    pub async fn post_event(
        &self,
        access_token: &str,
        event: &(impl Serialize + Sync),
    ) -> Result<DeliveryReceipt, Error> {
        let url = self.base_url.join(EVENTS_PATH).map_err(Error::InvalidUrl)?;
        debug!(%url, "posting event");

        let resp = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(event)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Delivery {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        debug!(%status, "event accepted");
        Ok(DeliveryReceipt {
            status: status.as_u16(),
        })
    }
}
