// ── Identity and token lifecycle ──

mod identity;
mod tokens;

pub use identity::{DEV_BYPASS_TOKEN, DEV_USER_ID, IdentityResolver};
pub use tokens::TokenLifecycle;

use secrecy::SecretString;

/// OAuth client credentials used for grant and refresh exchanges.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
}
