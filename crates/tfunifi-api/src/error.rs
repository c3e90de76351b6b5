use thiserror::Error;

/// Top-level error type for the `tfunifi-api` crate.
///
/// Covers every failure mode of the legacy controller API: authentication,
/// transport, envelope errors, and payload decoding. `tfunifi-core` passes
/// these through unchanged so the caller sees the controller's own message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A site or endpoint path that cannot be placed in the request URL.
    #[error("Invalid URL path: {0}")]
    InvalidPath(String),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Legacy API ──────────────────────────────────────────────────
    /// Error from the legacy API (parsed from the `{meta: {rc, msg}}` envelope).
    #[error("Legacy API error: {message}")]
    LegacyApi { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient transport error (timeout or
    /// refused connection).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_counts_as_expired() {
        let err = Error::Authentication {
            message: "session expired".into(),
        };
        assert!(err.is_auth_expired());
        assert!(!err.is_transient());
    }

    #[test]
    fn legacy_error_display_keeps_controller_message() {
        let err = Error::LegacyApi {
            message: "api.err.InvalidObject".into(),
        };
        assert_eq!(err.to_string(), "Legacy API error: api.err.InvalidObject");
        assert!(!err.is_auth_expired());
    }
}
