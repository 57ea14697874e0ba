//! Configuration for the Hearth directive bridge.
//!
//! TOML file + `HEARTH_`-prefixed environment variables, merged through
//! figment (env wins). Translates the loaded settings into
//! `hearth_api::TransportConfig` and `hearth_core::ClientCredentials`
//! for the collaborator clients.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use hearth_api::{TlsMode, TransportConfig};
use hearth_core::ClientCredentials;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration for the bridge.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// OAuth client credentials for grant and refresh exchanges.
    #[serde(default)]
    pub oauth: OAuthSection,

    /// Collaborator service endpoints.
    #[serde(default)]
    pub endpoints: EndpointsSection,

    /// HTTP transport settings shared by all collaborator clients.
    #[serde(default)]
    pub transport: TransportSection,

    /// Accept the development bypass bearer token and map it to the
    /// development user. Never enable outside local testing.
    #[serde(default)]
    pub dev_bypass: bool,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OAuthSection {
    /// OAuth client id issued for the skill.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret (plaintext — prefer `HEARTH_OAUTH_CLIENT_SECRET`).
    #[serde(default)]
    pub client_secret: String,

    /// Redirect URI registered with the authorization server.
    #[serde(default)]
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EndpointsSection {
    /// Identity service profile endpoint.
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    /// OAuth token exchange endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Event gateway base URL (regional; EU and FE differ).
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

impl Default for EndpointsSection {
    fn default() -> Self {
        Self {
            profile_url: default_profile_url(),
            token_url: default_token_url(),
            gateway_url: default_gateway_url(),
        }
    }
}

fn default_profile_url() -> String {
    "https://api.amazon.com/user/profile".into()
}
fn default_token_url() -> String {
    "https://api.amazon.com/auth/o2/token".into()
}
fn default_gateway_url() -> String {
    "https://api.amazonalexa.com".into()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransportSection {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Path to a custom CA certificate (PEM). System store when unset.
    pub ca_cert: Option<PathBuf>,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            ca_cert: None,
        }
    }
}

fn default_timeout() -> u64 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "hearth", "hearth").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hearth");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path + environment. Environment
/// values (`HEARTH_OAUTH__CLIENT_SECRET`, `HEARTH_TRANSPORT__TIMEOUT`,
/// `HEARTH_DEV_BYPASS`, ...) override file values; `__` separates the
/// section from the key.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HEARTH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation to collaborator settings ────────────────────────────

impl Config {
    /// Transport settings for the collaborator HTTP clients.
    pub fn transport_config(&self) -> TransportConfig {
        let tls = self
            .transport
            .ca_cert
            .as_ref()
            .map_or(TlsMode::System, |path| TlsMode::CustomCa(path.clone()));
        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.transport.timeout),
        }
    }

    /// OAuth client credentials. `Validation` when any field is empty —
    /// grant exchange cannot work without all three.
    pub fn client_credentials(&self) -> Result<ClientCredentials, ConfigError> {
        for (field, value) in [
            ("oauth.client_id", &self.oauth.client_id),
            ("oauth.client_secret", &self.oauth.client_secret),
            ("oauth.redirect_uri", &self.oauth.redirect_uri),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: "must not be empty".into(),
                });
            }
        }

        Ok(ClientCredentials {
            client_id: self.oauth.client_id.clone(),
            client_secret: SecretString::from(self.oauth.client_secret.clone()),
            redirect_uri: self.oauth.redirect_uri.clone(),
        })
    }

    /// Identity service profile URL.
    pub fn profile_url(&self) -> Result<Url, ConfigError> {
        parse_url("endpoints.profile_url", &self.endpoints.profile_url)
    }

    /// Token exchange URL.
    pub fn token_url(&self) -> Result<Url, ConfigError> {
        parse_url("endpoints.token_url", &self.endpoints.token_url)
    }

    /// Event gateway base URL.
    pub fn gateway_url(&self) -> Result<Url, ConfigError> {
        parse_url("endpoints.gateway_url", &self.endpoints.gateway_url)
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {value}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_when_file_is_empty() {
        let (_dir, path) = write_config("");
        let config = load_config_from(&path).unwrap();

        assert_eq!(
            config.endpoints.profile_url,
            "https://api.amazon.com/user/profile"
        );
        assert_eq!(config.endpoints.gateway_url, "https://api.amazonalexa.com");
        assert_eq!(config.transport.timeout, 10);
        assert!(!config.dev_bypass);
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
            dev_bypass = true

            [oauth]
            client_id = "client-1"
            client_secret = "hunter2"
            redirect_uri = "https://example.com/cb"

            [transport]
            timeout = 25
            "#,
        );
        let config = load_config_from(&path).unwrap();

        assert!(config.dev_bypass);
        assert_eq!(config.transport.timeout, 25);

        let credentials = config.client_credentials().unwrap();
        assert_eq!(credentials.client_id, "client-1");
        assert_eq!(credentials.client_secret.expose_secret(), "hunter2");
    }

    #[test]
    fn missing_oauth_fields_are_rejected() {
        let (_dir, path) = write_config("[oauth]\nclient_id = \"client-1\"\n");
        let config = load_config_from(&path).unwrap();

        let err = config.client_credentials().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. }
            if field == "oauth.client_secret"));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let (_dir, path) = write_config("[endpoints]\ngateway_url = \"not a url\"\n");
        let config = load_config_from(&path).unwrap();

        assert!(config.gateway_url().is_err());
        assert!(config.profile_url().is_ok());
    }

    #[test]
    fn transport_config_carries_timeout_and_tls() {
        let (_dir, path) = write_config("[transport]\ntimeout = 3\n");
        let config = load_config_from(&path).unwrap();
        let transport = config.transport_config();

        assert_eq!(transport.timeout, Duration::from_secs(3));
        assert!(matches!(transport.tls, TlsMode::System));
    }
}
