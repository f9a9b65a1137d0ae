// ── Runtime connection configuration ──
//
// These types describe *how* to reach a clientbook API. They never touch
// disk: the CLI loads profiles and hands an `ApiConfig` in.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use clientbook_api::{ApiClient, CredentialSource, TlsMode, TransportConfig};

use crate::error::CoreError;

/// API root used when no profile overrides it.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api/";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on a dev server).
    DangerAcceptInvalid,
}

/// Everything needed to build an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. `http://localhost:3001/api/`.
    pub base_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Parse `raw` as the API root.
    pub fn from_url_str(raw: &str) -> Result<Self, CoreError> {
        let url = Url::parse(raw).map_err(|e| CoreError::Config {
            message: format!("invalid API URL {raw:?}: {e}"),
        })?;
        Ok(Self::new(url))
    }

    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build the transport adapter, reading bearer tokens from `credentials`.
    pub fn build_client(
        &self,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<ApiClient, CoreError> {
        Ok(ApiClient::new(
            self.base_url.as_str(),
            &self.transport(),
            credentials,
        )?)
    }
}
