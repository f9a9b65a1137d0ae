// Login, registration, and logout. A successful login is written into
// the shared `SessionContext`; persisting it is the caller's concern.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use clientbook_api::ApiClient;

use crate::error::CoreError;
use crate::session::{SessionContext, SessionGrant, SessionSnapshot};

#[derive(Debug, Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
    session: SessionContext,
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Exchange credentials for a session and start it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionSnapshot, CoreError> {
        self.login_inner(username.trim(), password)
            .await
            .inspect_err(|e| warn!(username, error = %e, "login failed"))
    }

    async fn login_inner(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionSnapshot, CoreError> {
        require("username", username)?;
        require("password", password.expose_secret())?;

        let resp = self.api.login(username, password).await?;
        if resp.token.trim().is_empty() {
            return Err(CoreError::Deserialization {
                message: "login response carried an empty token".into(),
            });
        }
        self.session.begin(SessionGrant::from(resp));
        Ok(self.session.snapshot())
    }

    /// Create an account. Mismatched passwords are rejected locally.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), CoreError> {
        self.register_inner(username.trim(), email.trim(), password, confirm)
            .await
            .inspect_err(|e| warn!(username, error = %e, "registration failed"))
    }

    async fn register_inner(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), CoreError> {
        require("username", username)?;
        require("email", email)?;
        require("password", password.expose_secret())?;
        if !email.contains('@') {
            return Err(CoreError::validation("email", "is not an email address"));
        }
        if password.expose_secret() != confirm.expose_secret() {
            return Err(CoreError::validation("confirm", "passwords do not match"));
        }

        self.api.register(username, email, password).await?;
        info!(username, "account registered");
        Ok(())
    }

    pub fn logout(&self) {
        self.session.clear_session();
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}
