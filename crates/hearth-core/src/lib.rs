//! Directive dispatch and state-synchronization engine for the Hearth bridge.
//!
//! This crate sits between a voice-assistant directive protocol and a set of
//! remotely-controlled virtual devices ("endpoints") backed by a device-shadow
//! store:
//!
//! - **[`DirectiveEngine`]** — Routes one inbound directive by
//!   (namespace, name) to its handling rule, resolves the caller's identity
//!   and access token, reads/writes capability metadata and shadow state, and
//!   assembles the outbound response. [`process()`](DirectiveEngine::process)
//!   never escapes with an error: every failure is converted into a
//!   protocol-well-formed error response at the boundary.
//!
//! - **Stores** ([`store`]) — `CapabilityStore` / `ShadowStore` /
//!   `TokenStore` seams over the externally-persisted records, with
//!   `DashMap`-backed in-memory implementations for tests and the local
//!   sandbox. Shadow writes are partial merges, last-write-wins per key.
//!
//! - **Auth** ([`auth`]) — `IdentityResolver` (bearer token to user id, with
//!   an explicit development bypass) and `TokenLifecycle` (absolute
//!   expirations with a 30 s lookahead, transparent single-shot refresh).
//!
//! - **Events** ([`events`]) — `EventPublisher` transposes endpoint-cloud
//!   events (add/update, change, delete) into gateway events, resolving a
//!   valid access token before every delivery.
//!
//! - **Wire types** ([`wire`]) — directive parsing and the response builder,
//!   including context-property bookkeeping.

pub mod auth;
pub mod engine;
pub mod error;
pub mod events;
pub mod model;
pub mod store;
pub mod wire;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{ClientCredentials, IdentityResolver, TokenLifecycle};
pub use engine::DirectiveEngine;
pub use error::BridgeError;
pub use events::{EndpointEvent, EventPublisher};
pub use store::memory::{MemoryCapabilityStore, MemoryShadowStore, MemoryTokenStore};
pub use store::{CapabilityStore, ShadowStore, TokenStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Capability, CapabilityProperties, Endpoint, ShadowDocument, ShadowMap, SkuKind,
    SupportedProperty, SupportedRange, UserToken, shadow_key,
};
pub use wire::{ContextProperty, Directive, Response, ResponseBuilder};
