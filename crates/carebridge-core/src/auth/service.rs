//! Collaborator seam for the remote authentication endpoints.

use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{Role, User};

use super::Credential;

/// What a successful login or registration hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub credential: Credential,
    pub user: User,
}

/// Fields submitted when creating an account
#[derive(Clone, serde::Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Remote authentication service consumed by the session controller.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange a credential for its user.
    ///
    /// `Ok(None)` means the service rejected the credential; `Err` is a
    /// transport or decoding failure. Callers treat both the same way.
    async fn verify(&self, credential: &Credential) -> Result<Option<User>, ApiError>;

    /// Exchange an email and password for a credential and user.
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError>;

    /// Create an account and sign it in.
    async fn register(&self, registration: &Registration) -> Result<LoginGrant, ApiError>;
}
