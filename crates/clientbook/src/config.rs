//! CLI configuration: thin wrapper around `clientbook_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --insecure, --timeout).

use std::time::Duration;

use clientbook_core::{ApiConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use clientbook_config::{
    Config, Profile, SessionFile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate the active profile + global flags into an `ApiConfig`.
///
/// CLI flag overrides take priority over profile values. An unknown
/// profile is only an error when no `--api-url` was given.
pub fn resolve_api_config(
    config: &Config,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ApiConfig, CliError> {
    let profile = match (config.profile(profile_name), &global.api_url) {
        (Some(p), _) => p,
        (None, Some(_)) => Profile::default(),
        (None, None) => {
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
                available: config.profile_names(),
            });
        }
    };

    let mut api = clientbook_config::profile_to_api_config(&profile, &config.defaults)?;

    // 1. API URL (flag > env > profile)
    if let Some(ref url_str) = global.api_url {
        api.base_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }

    // 2. TLS verification
    if global.insecure {
        api.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 3. Timeout
    if let Some(secs) = global.timeout {
        api.timeout = Duration::from_secs(secs);
    }

    Ok(api)
}
