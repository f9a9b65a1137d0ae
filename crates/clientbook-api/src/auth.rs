use secrecy::SecretString;

/// Accessor for the bearer credential attached to outgoing requests.
///
/// The transport never owns or persists the token. It asks this source
/// before every request, so a login or logout performed elsewhere is
/// picked up by the next call without rebuilding the client.
pub trait CredentialSource: Send + Sync {
    /// The current bearer token, or `None` to send the request
    /// unauthenticated (the server is responsible for rejecting it).
    fn token(&self) -> Option<SecretString>;
}

/// No credentials: every request goes out without an `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialSource for Anonymous {
    fn token(&self) -> Option<SecretString> {
        None
    }
}

/// A fixed token, e.g. one supplied on the command line.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl CredentialSource for StaticToken {
    fn token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}
