//! Single-slot persistence for the bearer credential.
//!
//! Exactly one durable key (`token`) is ever written. Backend failures are
//! logged and never surface to callers: a read that fails is an absent
//! credential, and a failed write or clear is reported but not retried.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use keyring::Entry;
use tracing::{debug, warn};

/// Name of the single persisted key holding the credential
pub const CREDENTIAL_KEY: &str = "token";

/// Keychain service name
const SERVICE_NAME: &str = "carebridge";

/// Opaque bearer token issued by the login endpoint.
///
/// The value is never printed by `Debug` so it can't leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Durable holder of at most one credential.
pub trait CredentialStore: Send + Sync {
    /// Return the stored credential, if any. Absence is not an error.
    fn read(&self) -> Option<Credential>;

    /// Persist `credential`, replacing any prior value.
    fn write(&self, credential: &Credential);

    /// Remove the stored credential. Clearing an empty store is a no-op.
    fn clear(&self);
}

// ============================================================================
// File backend
// ============================================================================

/// Stores the credential in a `token` file, readable only by the owner.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store the credential inside `dir` (usually the cache directory)
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CREDENTIAL_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;

        // An existing file keeps its old mode on open
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Option<Credential> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    debug!(path = ?self.path, "Credential file is empty");
                    None
                } else {
                    Some(Credential::new(token))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read credential file");
                None
            }
        }
    }

    fn write(&self, credential: &Credential) {
        match self.write_file(credential.as_str()) {
            Ok(()) => debug!(path = ?self.path, "Stored credential"),
            Err(e) => warn!(path = ?self.path, error = %e, "Failed to store credential"),
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = ?self.path, "Cleared credential"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?self.path, error = %e, "Failed to remove credential file"),
        }
    }
}

// ============================================================================
// Keyring backend
// ============================================================================

/// Stores the credential in the OS keychain.
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> keyring::Result<Entry> {
        Entry::new(&self.service, CREDENTIAL_KEY)
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn read(&self) -> Option<Credential> {
        match self.entry().and_then(|entry| entry.get_password()) {
            Ok(token) if !token.is_empty() => Some(Credential::new(token)),
            Ok(_) | Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(service = %self.service, error = %e, "Failed to read credential from keychain");
                None
            }
        }
    }

    fn write(&self, credential: &Credential) {
        match self
            .entry()
            .and_then(|entry| entry.set_password(credential.as_str()))
        {
            Ok(()) => debug!(service = %self.service, "Stored credential in keychain"),
            Err(e) => warn!(service = %self.service, error = %e, "Failed to store credential in keychain"),
        }
    }

    fn clear(&self) {
        match self.entry().and_then(|entry| entry.delete_credential()) {
            Ok(()) => debug!(service = %self.service, "Cleared credential from keychain"),
            Err(keyring::Error::NoEntry) => {}
            Err(e) => warn!(service = %self.service, error = %e, "Failed to delete credential from keychain"),
        }
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Process-local slot, for headless use and tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `credential`
    pub fn with_credential(credential: impl Into<Credential>) -> Self {
        Self {
            slot: Mutex::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Option<Credential> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn write(&self, credential: &Credential) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(credential.clone());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
