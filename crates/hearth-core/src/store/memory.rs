// ── In-memory store implementations ──
//
// DashMap-backed implementations of the store seams, used by the test
// suites and the local sandbox. Concurrency behavior mirrors the real
// backends: endpoint-scoped keys, partial desired-view merges,
// last-write-wins per key.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::BridgeError;
use crate::model::{Endpoint, ShadowDocument, ShadowMap, UserToken};
use crate::store::{CapabilityStore, ShadowStore, TokenStore};

// ── Capabilities ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCapabilityStore {
    endpoints: DashMap<String, Endpoint>,
}

impl MemoryCapabilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CapabilityStore for MemoryCapabilityStore {
    async fn get(&self, endpoint_id: &str) -> Result<Endpoint, BridgeError> {
        self.endpoints
            .get(endpoint_id)
            .map(|e| e.clone())
            .ok_or_else(|| BridgeError::NotFound {
                entity: "endpoint",
                identifier: endpoint_id.to_string(),
            })
    }

    async fn put(&self, endpoint: Endpoint) -> Result<(), BridgeError> {
        self.endpoints.insert(endpoint.endpoint_id.clone(), endpoint);
        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Endpoint>, BridgeError> {
        Ok(self
            .endpoints
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.clone())
            .collect())
    }
}

// ── Shadows ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryShadowStore {
    shadows: DashMap<String, ShadowDocument>,
}

impl MemoryShadowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a patch into the reported view, simulating a device ack.
    /// Not part of the `ShadowStore` seam — only the device side writes
    /// the reported view.
    pub fn report(&self, endpoint_id: &str, patch: ShadowMap) {
        let mut doc = self.shadows.entry(endpoint_id.to_string()).or_default();
        doc.state.reported.extend(patch);
    }

    /// The current desired view, for assertions.
    pub fn desired(&self, endpoint_id: &str) -> ShadowMap {
        self.shadows
            .get(endpoint_id)
            .map(|d| d.state.desired.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ShadowStore for MemoryShadowStore {
    async fn get_reported(&self, endpoint_id: &str) -> Result<ShadowMap, BridgeError> {
        self.shadows
            .get(endpoint_id)
            .map(|d| d.state.reported.clone())
            .ok_or_else(|| BridgeError::Unavailable {
                endpoint_id: endpoint_id.to_string(),
            })
    }

    async fn set_desired(&self, endpoint_id: &str, patch: ShadowMap) -> Result<(), BridgeError> {
        let mut doc = self.shadows.entry(endpoint_id.to_string()).or_default();
        doc.state.desired.extend(patch);
        Ok(())
    }
}

// ── Tokens ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, UserToken>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, user_id: &str) -> Result<UserToken, BridgeError> {
        self.tokens
            .get(user_id)
            .map(|t| t.clone())
            .ok_or_else(|| BridgeError::NotFound {
                entity: "user token",
                identifier: user_id.to_string(),
            })
    }

    async fn put(&self, token: UserToken) -> Result<(), BridgeError> {
        self.tokens.insert(token.user_id.clone(), token);
        Ok(())
    }
}
