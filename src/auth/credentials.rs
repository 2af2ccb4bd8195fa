//! Durable credential storage.
//!
//! The bearer token and display username survive restarts. The primary
//! store is a permission-restricted file under the app data dir; the OS
//! keyring is used as a fallback so an existing keyring entry still
//! works after the data dir is wiped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const KEYRING_SERVICE: &str = "studycoach-auth";
const KEYRING_USER: &str = "session";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Explicit auth state passed to every Session Store call. There is no
/// ambient global credential; holders own their copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub token: String,
    pub username: String,
}

pub struct CredentialStore {
    data_dir: PathBuf,
}

impl CredentialStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(".credentials").join("session.json")
    }

    fn keyring_entry() -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
            .map_err(|e| CredentialError::Keyring(e.to_string()))
    }

    /// Load the persisted credential, if any: file first, then keyring.
    pub fn load(&self) -> Option<AuthContext> {
        if let Ok(data) = fs::read_to_string(self.credentials_path()) {
            if let Ok(auth) = serde_json::from_str(&data) {
                return Some(auth);
            }
        }

        let entry = Self::keyring_entry().ok()?;
        let data = entry.get_password().ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Persist the credential: always to the file store, best-effort to
    /// the keyring.
    pub fn store(&self, auth: &AuthContext) -> Result<(), CredentialError> {
        let json = serde_json::to_string(auth)?;

        let path = self.credentials_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &json)?;
        restrict_permissions(&path);

        if let Ok(entry) = Self::keyring_entry() {
            if let Err(e) = entry.set_password(&json) {
                log::warn!("Failed to store credential in keyring: {}", e);
            }
        }

        Ok(())
    }

    /// Remove the credential from both stores.
    pub fn clear(&self) -> Result<(), CredentialError> {
        let path = self.credentials_path();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        if let Ok(entry) = Self::keyring_entry() {
            let _ = entry.delete_credential();
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
