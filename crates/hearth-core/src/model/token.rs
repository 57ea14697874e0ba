// ── User token record ──
//
// The sole source of truth for "is this user's access token still valid".
// Carries the OAuth client credentials and redirect URI alongside the
// tokens so a refresh can be performed from the stored record alone.

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

use hearth_api::TokenGrant;

use crate::auth::ClientCredentials;

/// Safety margin subtracted from `expires_in` when a grant is stored.
const STORE_MARGIN_SECS: i64 = 5;

/// Lookahead window: a token this close to expiring is treated as
/// already expired, to avoid races with in-flight requests.
const EXPIRY_LOOKAHEAD_SECS: i64 = 30;

/// Per-user access/refresh token record.
#[derive(Debug, Clone)]
pub struct UserToken {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: SecretString,
    pub token_type: String,
    /// Absolute expiration: grant time + `expires_in` − 5 s.
    pub expiration_utc: DateTime<Utc>,
    /// Credentials needed to refresh, copied from the grant exchange.
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    /// Original grant inputs, kept for inspection during development.
    pub grant_code: Option<String>,
    pub grantee_token: Option<String>,
}

impl UserToken {
    /// Build a record from a fresh authorization grant.
    ///
    /// The expiration is computed once, here, at the moment the grant is
    /// stored — not re-derived on read.
    pub fn from_grant(
        user_id: impl Into<String>,
        grant: &TokenGrant,
        credentials: &ClientCredentials,
        granted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: grant.access_token.clone(),
            refresh_token: grant.refresh_token.clone(),
            token_type: grant.token_type.clone(),
            expiration_utc: expiration_for(grant.expires_in, granted_at),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            redirect_uri: credentials.redirect_uri.clone(),
            grant_code: None,
            grantee_token: None,
        }
    }

    /// Whether the access token must be refreshed before use.
    ///
    /// Expired means past the stored expiration OR inside the 30 s
    /// lookahead window of it: valid iff `now < expiration - 30s`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration_utc - Duration::seconds(EXPIRY_LOOKAHEAD_SECS)
    }

    /// Apply a refresh exchange result. Access token, refresh token,
    /// type, and expiration always move together — never partially.
    pub fn apply_refresh(&mut self, grant: &TokenGrant, refreshed_at: DateTime<Utc>) {
        self.access_token = grant.access_token.clone();
        self.refresh_token = grant.refresh_token.clone();
        self.token_type = grant.token_type.clone();
        self.expiration_utc = expiration_for(grant.expires_in, refreshed_at);
    }
}

fn expiration_for(expires_in: u64, at: DateTime<Utc>) -> DateTime<Utc> {
    let lifetime = i64::try_from(expires_in).unwrap_or(i64::MAX);
    at + Duration::seconds(lifetime.saturating_sub(STORE_MARGIN_SECS))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use secrecy::ExposeSecret;

    fn credentials() -> ClientCredentials {
        ClientCredentials {
            client_id: "client-1".to_string(),
            client_secret: "secret".to_string().into(),
            redirect_uri: "https://callback".to_string(),
        }
    }

    fn grant(access: &str, refresh: &str, expires_in: u64) -> TokenGrant {
        TokenGrant {
            access_token: access.to_string(),
            refresh_token: refresh.to_string().into(),
            token_type: "bearer".to_string(),
            expires_in,
        }
    }

    #[test]
    fn expiration_has_store_margin() {
        let at = Utc::now();
        let token = UserToken::from_grant("u1", &grant("a", "r", 3600), &credentials(), at);
        assert_eq!(token.expiration_utc, at + Duration::seconds(3595));
    }

    #[test]
    fn valid_iff_outside_lookahead() {
        let at = Utc::now();
        let token = UserToken::from_grant("u1", &grant("a", "r", 3600), &credentials(), at);

        // Well before expiration: valid.
        assert!(!token.is_expired(at));
        // 31s before expiration: still valid.
        assert!(!token.is_expired(token.expiration_utc - Duration::seconds(31)));
        // Exactly 30s before: treated as expired.
        assert!(token.is_expired(token.expiration_utc - Duration::seconds(30)));
        // Past expiration: expired.
        assert!(token.is_expired(token.expiration_utc + Duration::seconds(1)));
    }

    #[test]
    fn refresh_updates_all_fields_together() {
        let at = Utc::now();
        let mut token = UserToken::from_grant("u1", &grant("a1", "r1", 3600), &credentials(), at);

        let later = at + Duration::seconds(4000);
        token.apply_refresh(&grant("a2", "r2", 900), later);

        assert_eq!(token.access_token, "a2");
        assert_eq!(token.refresh_token.expose_secret(), "r2");
        assert_eq!(token.expiration_utc, later + Duration::seconds(895));
    }
}
