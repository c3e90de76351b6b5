//! CLI error types with miette diagnostics.
//!
//! Maps core and configuration errors into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use tfunifi_config::ConfigError;
use tfunifi_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(tfunifi::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Try: tfunifi --insecure ruleset show default:LAN_IN"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: tfunifi_core::CoreError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(tfunifi::tls_error),
        help(
            "Use --insecure (-k) to accept a self-signed certificate, \
             or set ca_cert in the config file."
        )
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(tfunifi::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(tfunifi::auth_failed),
        help(
            "Verify username and password (UNIFI_USERNAME / UNIFI_PASSWORD).\n\
             The account must be a local controller account, not a UI.com login."
        )
    )]
    AuthFailed { message: String },

    // ── Reconciliation ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(tfunifi::drift),
        help(
            "List every rule of the ruleset exactly once across --before and --after.\n\
             Run: tfunifi ruleset show {id}"
        )
    )]
    Drift { id: String, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(tfunifi::stale),
        help("The rules changed while the plan was computed. Run the command again.")
    )]
    Stale { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller error: {message}")]
    #[diagnostic(code(tfunifi::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tfunifi::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(
        code(tfunifi::invalid_import_id),
        help("Ruleset identifiers look like default:LAN_IN or default:wanv6_local.")
    )]
    InvalidImportId { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{error}")]
    #[diagnostic(
        code(tfunifi::config),
        help("Expected configuration at: {path}")
    )]
    Config { error: ConfigError, path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(tfunifi::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::Config {
                error: ConfigError::NoCredentials { .. },
                ..
            } => exit_code::AUTH,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Drift { .. } | Self::Stale { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::InvalidImportId { .. } | Self::Json(_) => {
                exit_code::USAGE
            }
            Self::Config { .. } | Self::ApiError { .. } | Self::Io(_) => exit_code::GENERAL,
        }
    }

    pub fn config(error: ConfigError, path: &std::path::Path) -> Self {
        Self::Config {
            error,
            path: path.display().to_string(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RulesetDrift {
                ref site, ruleset, ..
            } => CliError::Drift {
                id: format!("{site}:{ruleset}"),
                message: err.to_string(),
            },

            CoreError::RuleNotInSnapshot { .. } => CliError::Stale {
                message: err.to_string(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "ruleset".into(),
                reason: message,
            },

            CoreError::InvalidImportId { .. } => CliError::InvalidImportId {
                message: err.to_string(),
            },

            CoreError::Api(api) => from_api(api),
        }
    }
}

fn from_api(err: tfunifi_core::ApiError) -> CliError {
    use tfunifi_core::ApiError;

    match err {
        ApiError::Authentication { message } => CliError::AuthFailed { message },
        ApiError::Tls(message) => CliError::TlsError { message },
        ApiError::Transport(ref e) if e.is_timeout() => CliError::Timeout,
        ApiError::Transport(ref e) if e.is_connect() => CliError::ConnectionFailed {
            url: e.url().map_or_else(|| "(unknown)".into(), ToString::to_string),
            source: CoreError::Api(err),
        },
        other => CliError::ApiError {
            message: other.to_string(),
        },
    }
}
