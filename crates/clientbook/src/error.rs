//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use clientbook_config::ConfigError;
use clientbook_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the clientbook API at {url}")]
    #[diagnostic(
        code(clientbook::connection_failed),
        help(
            "Check that the API server is running and reachable.\n\
             Reason: {reason}\n\
             Override the URL with --api-url or configure a profile: clientbook config init"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in (profile '{profile}')")]
    #[diagnostic(
        code(clientbook::not_logged_in),
        help("Run: clientbook login --profile {profile}")
    )]
    NotLoggedIn { profile: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(clientbook::auth_failed),
        help(
            "Check your username and password, or log in again if the session expired.\n\
             Run: clientbook login"
        )
    )]
    AuthFailed { message: String },

    #[error("Permission denied: {message}")]
    #[diagnostic(code(clientbook::forbidden))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(clientbook::not_found),
        help("Run: clientbook {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(
        code(clientbook::conflict),
        help("Another record already uses this identification.")
    )]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(clientbook::api_error))]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from the API: {message}")]
    #[diagnostic(code(clientbook::unexpected_response))]
    UnexpectedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clientbook::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(clientbook::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: clientbook config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(clientbook::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(clientbook::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(clientbook::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotLoggedIn { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the API URL a connection failure was reported without.
    pub fn with_url(self, api_url: &str) -> Self {
        match self {
            Self::ConnectionFailed { reason, .. } => Self::ConnectionFailed {
                url: api_url.to_owned(),
                reason,
            },
            other => other,
        }
    }

    /// Like `From<CoreError>`, but names the client a 404 refers to.
    pub fn for_client(err: CoreError, id: &str) -> Self {
        if err.is_not_found() {
            Self::NotFound {
                resource_type: "client".into(),
                identifier: id.into(),
                list_command: "clients list".into(),
            }
        } else {
            err.into()
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { reason } => CliError::ConnectionFailed {
                url: "(configured API)".into(),
                reason,
            },

            CoreError::NotAuthenticated { missing } => CliError::AuthFailed {
                message: format!("session has no {missing}"),
            },

            CoreError::Api { status: 401, body } => CliError::AuthFailed { message: body },

            CoreError::Api { status: 403, body } => CliError::Forbidden { message: body },

            CoreError::Api { status: 404, body } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: body,
                list_command: "clients list".into(),
            },

            CoreError::Api { status: 409, body } => CliError::Conflict { message: body },

            CoreError::Api { status, body } => CliError::ApiError {
                status,
                message: body,
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Deserialization { message } => CliError::UnexpectedResponse { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
