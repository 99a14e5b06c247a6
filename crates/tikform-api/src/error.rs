use thiserror::Error;

/// Top-level error type for the `tikform-api` crate.
///
/// Covers every failure mode of the RouterOS REST surface: authentication,
/// transport, structured API errors and decoding. `tikform-core` maps these
/// into diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Router rejected the credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`-style URLs).
    #[error("Cannot build a REST path from base URL {0}")]
    InvalidPath(String),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── REST API ────────────────────────────────────────────────────
    /// Structured error from RouterOS (`{"error": N, "message": .., "detail": ..}`).
    #[error("RouterOS API error (HTTP {status}): {message}{}", detail_suffix(.detail.as_deref()))]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// The addressed record or menu does not exist (HTTP 404).
    #[error("Not found: {path}")]
    NotFound { path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(" -- {d}")).unwrap_or_default()
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}
