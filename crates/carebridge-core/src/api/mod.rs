//! REST API client module for the CareBridge service.
//!
//! This module provides the `ApiClient` for signing in and verifying
//! credentials, and the role-scoped `AccessProfile` handles through which
//! signed-in views reach the data endpoints.
//!
//! Every protected request carries the credential in a `token` header.

pub mod client;
pub mod error;
pub mod profile;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use profile::{AccessProfile, MentorApi, ParentApi, SharedApi};
