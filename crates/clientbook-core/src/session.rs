// ── Session context ──
//
// Authenticated-session state (flag, bearer token, user id, display name),
// passed explicitly to whatever needs it. Cloning shares the same state, so
// a login performed through one handle is visible to the transport and the
// services holding another.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use tracing::info;

use clientbook_api::{CredentialSource, LoginResponse};

/// What a successful login yields.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: SecretString,
    pub user_id: String,
    pub display_name: Option<String>,
}

impl From<LoginResponse> for SessionGrant {
    fn from(r: LoginResponse) -> Self {
        Self {
            token: SecretString::from(r.token),
            user_id: r.user_id,
            display_name: r.display_name.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Point-in-time copy of the session, used to persist and restore it.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub token: Option<SecretString>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

/// Shared handle to the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<SessionSnapshot>>,
}

impl SessionContext {
    /// An empty, unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted state.
    pub fn restore(snapshot: SessionSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&SessionSnapshot) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut SessionSnapshot) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// `true` once a login succeeded and a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.authenticated && s.token.is_some())
    }

    pub fn token(&self) -> Option<SecretString> {
        self.read(|s| s.token.clone())
    }

    /// Replace the bearer token without touching the rest of the session.
    pub fn set_token(&self, token: Option<SecretString>) {
        self.write(|s| s.token = token);
    }

    pub fn user_id(&self) -> Option<String> {
        self.read(|s| s.user_id.clone())
    }

    pub fn display_name(&self) -> Option<String> {
        self.read(|s| s.display_name.clone())
    }

    /// Start an authenticated session from a login grant.
    pub fn begin(&self, grant: SessionGrant) {
        info!(user_id = %grant.user_id, "session started");
        self.write(|s| {
            *s = SessionSnapshot {
                authenticated: true,
                token: Some(grant.token),
                user_id: Some(grant.user_id),
                display_name: grant.display_name,
            };
        });
    }

    /// Drop every piece of session data.
    pub fn clear_session(&self) {
        info!("session cleared");
        self.write(|s| *s = SessionSnapshot::default());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(Clone::clone)
    }
}

impl CredentialSource for SessionContext {
    fn token(&self) -> Option<SecretString> {
        SessionContext::token(self)
    }
}
