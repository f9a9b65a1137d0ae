// ── Core error types ──
//
// Errors surfaced to views. The store records these and hands clones to
// every subscriber, so the type is `Clone` and carries no live sources.
// The `From<clientbook_api::Error>` impl translates transport-layer errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    /// No response was received from the server.
    #[error("Cannot reach server: {reason}")]
    Transport { reason: String },

    // ── API ──────────────────────────────────────────────────────────
    /// The server answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    // ── Client-side checks ───────────────────────────────────────────
    /// Input rejected before any network call was made.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Session data required by the operation is missing.
    #[error("Not authenticated: missing {missing}")]
    NotAuthenticated { missing: String },

    // ── Data ─────────────────────────────────────────────────────────
    /// A response decoded but didn't fit the domain model
    /// (bad date, unknown gender code, malformed JSON).
    #[error("Unexpected server data: {message}")]
    Deserialization { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status reported by the server, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` for a 409 from the server (e.g. duplicate identification).
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Returns `true` when the failure is the caller's session, either
    /// missing locally or rejected by the server.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::NotAuthenticated { .. }) || matches!(self.status(), Some(401 | 403))
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<clientbook_api::Error> for CoreError {
    fn from(err: clientbook_api::Error) -> Self {
        match err {
            clientbook_api::Error::Transport(e) => match e.status() {
                Some(status) => CoreError::Api {
                    status: status.as_u16(),
                    body: e.to_string(),
                },
                None => CoreError::Transport {
                    reason: e.to_string(),
                },
            },
            clientbook_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            clientbook_api::Error::Tls(msg) => CoreError::Transport {
                reason: format!("TLS error: {msg}"),
            },
            clientbook_api::Error::InvalidCredential(msg) => CoreError::NotAuthenticated {
                missing: format!("a usable token ({msg})"),
            },
            clientbook_api::Error::Api { status, body } => CoreError::Api { status, body },
            clientbook_api::Error::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
        }
    }
}
