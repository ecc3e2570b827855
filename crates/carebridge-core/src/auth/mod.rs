//! Authentication module for the session lifecycle and credential storage.
//!
//! This module provides:
//! - `SessionController`: verifies the stored credential once at startup and
//!   owns the signed-in state for the rest of the process
//! - `CredentialStore`: single-slot persistence for the bearer credential,
//!   backed by a file, the OS keychain, or memory
//! - `AuthService`: the remote login and verification endpoints
//!
//! Credentials never expire locally; a rejected credential is discarded and
//! the user signs in again.

pub mod credentials;
pub mod service;
pub mod session;

pub use credentials::{
    Credential, CredentialStore, FileCredentialStore, KeyringCredentialStore,
    MemoryCredentialStore, CREDENTIAL_KEY,
};
pub use service::{AuthService, LoginGrant, Registration};
pub use session::{LoginError, SessionController, SessionState, DEFAULT_VERIFY_TIMEOUT};
