// ── Store seams ──
//
// The externally-persisted records behind the engine, modeled as
// constructor-injected trait objects so every component can be tested
// with the in-memory implementations — no process-wide clients.

pub mod memory;

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::model::{Endpoint, ShadowMap, UserToken};

/// Per-endpoint capability descriptors and display metadata.
///
/// Read-heavy from the directive path: discovery enumerates all endpoints
/// for a user, and every control directive re-reads capability
/// configuration for bounds and instance membership. Writes happen only
/// on endpoint create/update, outside this engine.
#[async_trait]
pub trait CapabilityStore: Send + Sync {
    /// Fetch one endpoint record. `NotFound` if absent.
    async fn get(&self, endpoint_id: &str) -> Result<Endpoint, BridgeError>;

    /// Create or replace an endpoint record.
    async fn put(&self, endpoint: Endpoint) -> Result<(), BridgeError>;

    /// All endpoints owned by a user. Unordered, finite; empty when the
    /// user owns none.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Endpoint>, BridgeError>;
}

/// Per-endpoint desired/reported property state, eventually consistent
/// with the physical device.
#[async_trait]
pub trait ShadowStore: Send + Sync {
    /// The last device-confirmed property values. `Unavailable` when the
    /// device has never reported — callers treat that as "no known
    /// state", not a hard error.
    async fn get_reported(&self, endpoint_id: &str) -> Result<ShadowMap, BridgeError>;

    /// Merge a patch into the desired view. Only the supplied keys are
    /// updated; all other keys stand. Last-write-wins per key — an
    /// accepted race for concurrent directives on one endpoint.
    async fn set_desired(&self, endpoint_id: &str, patch: ShadowMap) -> Result<(), BridgeError>;
}

/// Per-user token records. The stored row is the sole source of truth
/// for whether a user's access token is still valid.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Fetch one user's token record. `NotFound` if the user never
    /// completed a grant.
    async fn get(&self, user_id: &str) -> Result<UserToken, BridgeError>;

    /// Persist a grant or refresh result. One atomic put: access token,
    /// refresh token, type, and expiration land together.
    async fn put(&self, token: UserToken) -> Result<(), BridgeError>;
}
