// ── Core error types ──
//
// User-facing errors from rosterly-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<rosterly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach roster service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- sign in again")]
    SessionExpired,

    #[error("Request timed out")]
    Timeout,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// A cross-module dependency (e.g. the group directory) failed to
    /// load, so the dependent operation was abandoned.
    #[error("Required data unavailable: {resource}")]
    DependencyUnavailable { resource: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Service error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if signing in again could resolve this error.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::AuthenticationFailed { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rosterly_api::Error> for CoreError {
    fn from(err: rosterly_api::Error) -> Self {
        match err {
            rosterly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            rosterly_api::Error::SessionExpired => CoreError::SessionExpired,
            rosterly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            rosterly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            rosterly_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS: {message}"),
            },
            rosterly_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            rosterly_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("malformed service response: {message}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn session_expiry_maps_through() {
        let err: CoreError = rosterly_api::Error::SessionExpired.into();
        assert!(matches!(err, CoreError::SessionExpired));
        assert!(err.needs_reauth());
    }

    #[test]
    fn service_errors_keep_status() {
        let err: CoreError = rosterly_api::Error::Api {
            message: "uid not found".into(),
            status: 500,
        }
        .into();
        match err {
            CoreError::Api { message, status } => {
                assert_eq!(message, "uid not found");
                assert_eq!(status, Some(500));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
