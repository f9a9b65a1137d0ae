// Account endpoints
//
// Login exchanges a username/password for a bearer token; registration
// creates the account and returns nothing useful. Neither stores the
// token: the caller hands it to its session collaborator.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::rest::client::ApiClient;
use crate::rest::types::{LoginRequest, LoginResponse, RegisterRequest};

impl ApiClient {
    /// Authenticate and obtain session material.
    ///
    /// `POST auth/login` with `{"username": "...", "password": "..."}`
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.url(&["auth", "login"])?;
        debug!(username, "logging in");
        self.post(
            url,
            &LoginRequest {
                username,
                password: password.expose_secret(),
            },
        )
        .await
    }

    /// Register a new account.
    ///
    /// `POST auth/register` with `{"username", "email", "password"}`
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        let url = self.url(&["auth", "register"])?;
        debug!(username, "registering account");
        self.post_no_response(
            url,
            &RegisterRequest {
                username,
                email,
                password: password.expose_secret(),
            },
        )
        .await
    }
}
