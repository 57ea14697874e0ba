// hearth-api: Async HTTP clients for the Hearth bridge's upstream collaborators
//
// Three thin, typed clients over `reqwest`:
// - `IdentityClient`  — resolves a bearer token to a user profile
// - `OAuthClient`     — authorization-code and refresh-token exchanges
// - `GatewayClient`   — pushes asynchronous events to the assistant gateway
//
// All share `TransportConfig` for timeout/TLS settings. `hearth-core` maps
// the `Error` type here into its own engine-level taxonomy.

pub mod error;
pub mod gateway;
pub mod identity;
pub mod oauth;
pub mod transport;

pub use error::Error;
pub use gateway::{DeliveryReceipt, GatewayClient};
pub use identity::{IdentityClient, UserProfile};
pub use oauth::{OAuthClient, TokenGrant};
pub use transport::{TlsMode, TransportConfig};
