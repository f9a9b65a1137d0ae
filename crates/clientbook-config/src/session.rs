// ── Persisted session ──
//
// Session metadata lives in a small TOML file per profile. The bearer
// token goes to the OS keyring when one is available; otherwise it is
// written into the file (owner-only permissions on unix).

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use clientbook_core::SessionSnapshot;

use crate::ConfigError;

const KEYRING_SERVICE: &str = "clientbook";

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredSession {
    #[serde(default)]
    authenticated: bool,
    user_id: Option<String>,
    display_name: Option<String>,
    /// Plaintext fallback, only when the keyring refused the token.
    token: Option<String>,
}

/// On-disk home of one profile's session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
    keyring_account: Option<String>,
}

impl SessionFile {
    /// `<data dir>/profiles/<profile>/session.toml`, token in the keyring.
    pub fn for_profile(profile: &str) -> Self {
        Self {
            path: crate::data_dir()
                .join("profiles")
                .join(profile)
                .join("session.toml"),
            keyring_account: Some(format!("{profile}/token")),
        }
    }

    /// A session file at `path` that never touches the keyring.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keyring_account: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        let account = self.keyring_account.as_deref()?;
        keyring::Entry::new(KEYRING_SERVICE, account)
            .inspect_err(|e| debug!(error = %e, "keyring unavailable"))
            .ok()
    }

    /// Read the persisted session. A missing file is an empty session.
    pub fn load(&self) -> Result<SessionSnapshot, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionSnapshot::default());
            }
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSession = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;

        let token = stored.token.or_else(|| {
            self.keyring_entry()
                .and_then(|entry| entry.get_password().ok())
        });

        Ok(SessionSnapshot {
            authenticated: stored.authenticated && token.is_some(),
            token: token.map(SecretString::from),
            user_id: stored.user_id,
            display_name: stored.display_name,
        })
    }

    /// Persist `session`, replacing whatever was stored before.
    pub fn save(&self, session: &SessionSnapshot) -> Result<(), ConfigError> {
        let mut stored = StoredSession {
            authenticated: session.authenticated,
            user_id: session.user_id.clone(),
            display_name: session.display_name.clone(),
            token: None,
        };

        if let Some(token) = &session.token {
            let in_keyring = self
                .keyring_entry()
                .is_some_and(|entry| match entry.set_password(token.expose_secret()) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(error = %e, "keyring rejected token, storing it in the session file");
                        false
                    }
                });
            if !in_keyring {
                stored.token = Some(token.expose_secret().to_owned());
            }
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&self.path, toml::to_string_pretty(&stored)?.as_bytes())?;
        Ok(())
    }

    /// Forget the session: remove the file and the keyring entry.
    pub fn clear(&self) -> Result<(), ConfigError> {
        if let Some(entry) = self.keyring_entry() {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!(error = %e, "failed to remove token from keyring"),
            }
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by older builds.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
