// ── Core error types ──
//
// Errors raised by the lifecycle engine. Consumers never see HTTP status
// codes or raw JSON failures directly: the `From<tikform_api::Error>` impl
// translates transport-layer errors into domain variants, and the
// lifecycle helpers turn these into diagnostics.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Router request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Unknown resource type '{type_name}'")]
    UnknownResourceType { type_name: String },

    #[error("Router returned {value:?} for {attribute}, which does not decode as {expected}")]
    Decode {
        attribute: String,
        value: String,
        expected: String,
    },

    #[error("Router did not return an id for the new {path} entry")]
    MissingId { path: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        /// RouterOS `detail` field, usually the CLI parser's complaint.
        detail: Option<String>,
    },

    // ── Configuration / state errors ─────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("State file {path}: {reason}")]
    State { path: String, reason: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` when the error means the addressed remote entry is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tikform_api::Error> for CoreError {
    fn from(err: tikform_api::Error) -> Self {
        match err {
            tikform_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            tikform_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                        detail: None,
                    }
                }
            }
            tikform_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tikform_api::Error::InvalidPath(base) => CoreError::Config {
                message: format!("Router URL {base} cannot carry a REST path"),
            },
            tikform_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            tikform_api::Error::Api {
                status,
                message,
                detail,
            } => CoreError::Api {
                message,
                status: Some(status),
                detail,
            },
            tikform_api::Error::NotFound { path } => CoreError::NotFound { path },
            tikform_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
