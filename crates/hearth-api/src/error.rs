use thiserror::Error;

/// Top-level error type for the `hearth-api` crate.
///
/// Covers every failure mode across the three collaborator surfaces:
/// identity lookup, OAuth token exchange, and event-gateway delivery.
/// `hearth-core` maps these into its engine-level taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Identity ────────────────────────────────────────────────────
    /// Identity lookup failed (bad token, revoked grant, no subject).
    #[error("Identity lookup failed: {message}")]
    Identity { message: String },

    // ── OAuth ───────────────────────────────────────────────────────
    /// Structured error from the OAuth token endpoint
    /// (`{"error": "...", "error_description": "..."}`).
    #[error("Token exchange failed ({error}): {description}")]
    TokenExchange { error: String, description: String },

    // ── Event gateway ───────────────────────────────────────────────
    /// The gateway rejected an event delivery.
    #[error("Event delivery rejected (HTTP {status}): {message}")]
    Delivery { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
