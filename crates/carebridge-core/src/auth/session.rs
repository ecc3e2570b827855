//! Session lifecycle: verify the stored credential once, then track sign-in
//! and sign-out for the rest of the process.
//!
//! ```text
//! Loading --(no credential)--------------------> Unauthenticated
//! Loading --(verified)-------------------------> Authenticated
//! Loading --(rejected | error | timeout)-------> Unauthenticated  (store cleared)
//! Unauthenticated | Authenticated --(login)----> Authenticated    (store written)
//! Authenticated --(logout)---------------------> Unauthenticated  (store cleared)
//! ```
//!
//! Every mutating operation runs under one async lock, so operations issued
//! while another is in flight wait their turn and the last one to settle
//! decides the final state. On each path the store is touched first, then
//! the state is published, then navigation is signalled.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{AccessProfile, ApiClient, ApiError};
use crate::models::User;
use crate::nav::{Navigator, Route};

use super::{AuthService, Credential, CredentialStore, LoginGrant, Registration};

/// Upper bound on the startup verification call
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

const GENERIC_LOGIN_FAILURE: &str = "Login failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup verification has not settled yet
    Loading,
    Unauthenticated,
    Authenticated { user: User },
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated { .. } => "authenticated",
        }
    }
}

/// A login or registration failure, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoginError {
    message: String,
}

impl LoginError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: GENERIC_LOGIN_FAILURE.to_string(),
            };
        }
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_api(err: &ApiError) -> Self {
        if let Some(message) = err.server_message() {
            return Self::new(message);
        }
        match err {
            ApiError::NetworkError(e) if e.is_timeout() => {
                Self::new("Connection timed out. Please try again.")
            }
            ApiError::NetworkError(e) if e.is_connect() => {
                Self::new("Unable to connect to server. Check your internet connection.")
            }
            ApiError::RateLimited => Self::new(err.to_string()),
            _ => Self::new(GENERIC_LOGIN_FAILURE),
        }
    }
}

/// Single source of truth for who is signed in.
///
/// Construct once at startup, call [`bootstrap`](Self::bootstrap) once, and
/// hand references to every consumer.
pub struct SessionController {
    store: Arc<dyn CredentialStore>,
    auth: Arc<dyn AuthService>,
    navigator: Arc<dyn Navigator>,
    verify_timeout: Option<Duration>,
    state: watch::Sender<SessionState>,
    op_lock: Mutex<()>,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        auth: Arc<dyn AuthService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            store,
            auth,
            navigator,
            verify_timeout: Some(DEFAULT_VERIFY_TIMEOUT),
            state,
            op_lock: Mutex::new(()),
        }
    }

    /// Bound the startup verification call. `None` waits indefinitely.
    pub fn with_verify_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.verify_timeout = timeout;
        self
    }

    pub fn current_state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Receiver that observes every published state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Resolve the startup `Loading` state from the stored credential.
    ///
    /// Only the first call does anything; later calls return immediately.
    pub async fn bootstrap(&self) {
        let _op = self.op_lock.lock().await;

        if !self.state.borrow().is_loading() {
            debug!("Session already resolved, skipping bootstrap");
            return;
        }

        let Some(credential) = self.store.read() else {
            info!("No stored credential");
            self.transition(SessionState::Unauthenticated);
            return;
        };

        match self.verify(&credential).await {
            Some(user) => {
                info!(user_id = user.user_id, role = %user.role, "Stored credential verified");
                self.transition(SessionState::Authenticated { user });
            }
            None => {
                self.store.clear();
                self.transition(SessionState::Unauthenticated);
            }
        }
    }

    /// Run [`bootstrap`](Self::bootstrap) in the background so a front end
    /// can render the `Loading` placeholder meanwhile.
    pub fn spawn_bootstrap(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.bootstrap().await })
    }

    async fn verify(&self, credential: &Credential) -> Option<User> {
        let call = self.auth.verify(credential);
        let outcome = match self.verify_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis() as u64, "Credential verification timed out");
                    return None;
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                warn!("Stored credential was rejected");
                None
            }
            Err(e) => {
                warn!(error = %e, "Credential verification failed");
                None
            }
        }
    }

    // =========================================================================
    // Sign in / sign out
    // =========================================================================

    /// Sign in through the remote service.
    ///
    /// On failure nothing changes and the returned error carries the message
    /// to display.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), LoginError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(LoginError::new("Email and password required"));
        }

        let _op = self.op_lock.lock().await;
        match self.auth.login(email, password).await {
            Ok(grant) => {
                self.apply_login(grant);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Err(LoginError::from_api(&e))
            }
        }
    }

    /// Create an account and sign it in, exactly like [`login`](Self::login).
    pub async fn register(&self, registration: &Registration) -> Result<(), LoginError> {
        if registration.name.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            return Err(LoginError::new("Name, email and password required"));
        }

        let _op = self.op_lock.lock().await;
        match self.auth.register(registration).await {
            Ok(grant) => {
                self.apply_login(grant);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                Err(LoginError::from_api(&e))
            }
        }
    }

    /// Commit an already-validated credential and user. Performs no checks.
    pub async fn commit_login(&self, credential: Credential, user: User) {
        let _op = self.op_lock.lock().await;
        self.apply_login(LoginGrant { credential, user });
    }

    fn apply_login(&self, grant: LoginGrant) {
        self.store.write(&grant.credential);
        info!(user_id = grant.user.user_id, role = %grant.user.role, "Signed in");
        self.transition(SessionState::Authenticated { user: grant.user });
        self.navigator.navigate(Route::LANDING);
    }

    /// Forget the credential and user. Repeating it is a no-op.
    pub async fn logout(&self) {
        let _op = self.op_lock.lock().await;

        self.store.clear();

        let already_signed_out = matches!(*self.state.borrow(), SessionState::Unauthenticated);
        if already_signed_out {
            debug!("Already signed out");
            return;
        }

        info!("Signed out");
        self.transition(SessionState::Unauthenticated);
        self.navigator.navigate(Route::ENTRY);
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// Role-scoped API handle for the signed-in user, or `None` when no one
    /// is signed in.
    pub fn access_profile(&self, client: &ApiClient) -> Option<AccessProfile> {
        let user = self.current_user()?;
        let credential = self.store.read()?;
        Some(AccessProfile::new(client.with_token(credential), &user))
    }

    fn transition(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        debug!(from = previous.name(), to = self.state.borrow().name(), "Session transition");
    }
}
