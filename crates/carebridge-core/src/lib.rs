//! CareBridge core library.
//!
//! Session lifecycle, credential storage, the REST API client with its
//! role-scoped access profiles, and the data models shared by every
//! CareBridge front end.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;

pub use api::{AccessProfile, ApiClient, ApiError};
pub use auth::{Credential, CredentialStore, LoginError, SessionController, SessionState};
pub use config::Config;
pub use nav::{guard, Gate, Navigator, Route};
