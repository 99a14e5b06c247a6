//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tikform_config::ConfigError;
use tikform_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    /// A lifecycle or validation step reported error diagnostics.
    pub const DIAGNOSTICS: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(tikform::connection_failed),
        help(
            "Check that the router is reachable and the www-ssl (or www) service\n\
             is enabled under /ip service.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS certificate verification failed for {url}")]
    #[diagnostic(
        code(tikform::tls_error),
        help(
            "RouterOS ships a self-signed certificate for www-ssl.\n\
             Use --insecure (-k) to accept it, or configure ca_cert in your profile."
        )
    )]
    TlsError { url: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(tikform::auth_failed),
        help(
            "Verify the username and password, and that the user's group has the\n\
             read, write, api and rest-api policies.\n\
             Run: tikform config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(tikform::no_credentials),
        help(
            "Configure credentials with: tikform config init\n\
             Or set TIKFORM_USERNAME and TIKFORM_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(tikform::not_found),
        help("Run: tikform {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{address} is already tracked in state")]
    #[diagnostic(
        code(tikform::already_tracked),
        help("Run: tikform state rm {address} first to re-import it")
    )]
    AlreadyTracked { address: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Router error: {message}")]
    #[diagnostic(code(tikform::api_error))]
    ApiError {
        message: String,
        #[help]
        detail: Option<String>,
    },

    /// Lifecycle or validation diagnostics were already printed.
    #[error("{count} error(s) reported")]
    #[diagnostic(code(tikform::diagnostics))]
    Diagnostics { count: usize },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tikform::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tikform::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: tikform config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(tikform::no_config),
        help(
            "Create one with: tikform config init\n\
             Or pass --router and set TIKFORM_USERNAME / TIKFORM_PASSWORD.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(tikform::config))]
    Config(Box<figment::Error>),

    #[error("Manifest {path}: {reason}")]
    #[diagnostic(
        code(tikform::manifest),
        help("Each [[resource]] table needs a `type`, a `name` and its attributes.")
    )]
    Manifest { path: String, reason: String },

    #[error("State file {path}: {reason}")]
    #[diagnostic(code(tikform::state))]
    State { path: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tikform::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out")]
    #[diagnostic(
        code(tikform::timeout),
        help("Increase timeout with --timeout or check router responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(tikform::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(tikform::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Diagnostics { .. } => exit_code::DIAGNOSTICS,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::AlreadyTracked { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                if reason.starts_with("TLS error") {
                    CliError::TlsError { url }
                } else {
                    CliError::ConnectionFailed {
                        url,
                        source: reason.into(),
                    }
                }
            }

            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound { path } => CliError::NotFound {
                resource_type: "router object".into(),
                identifier: path,
                list_command: "state list".into(),
            },

            CoreError::UnknownResourceType { type_name } => CliError::NotFound {
                resource_type: "resource type".into(),
                identifier: type_name,
                list_command: "schema".into(),
            },

            CoreError::Api {
                message, detail, ..
            } => CliError::ApiError { message, detail },

            CoreError::Config { message } => CliError::Validation {
                field: "router".into(),
                reason: message,
            },

            CoreError::State { path, reason } => CliError::State { path, reason },

            err @ (CoreError::Decode { .. }
            | CoreError::MissingId { .. }
            | CoreError::Internal(_)) => CliError::ApiError {
                message: err.to_string(),
                detail: None,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see tikform config profiles)".into(),
            },
            ConfigError::Manifest { path, reason } => CliError::Manifest { path, reason },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Keyring(err) => CliError::Validation {
                field: "keyring".into(),
                reason: err.to_string(),
            },
            ConfigError::Serialization(err) => CliError::Validation {
                field: "config".into(),
                reason: err.to_string(),
            },
            ConfigError::Io(err) => CliError::Io(err),
        }
    }
}
