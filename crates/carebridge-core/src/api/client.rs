//! API client for communicating with the CareBridge REST API.
//!
//! This module provides the `ApiClient` struct for signing in, verifying a
//! stored credential, and making authenticated requests on behalf of the
//! role-scoped profiles.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthService, Credential, LoginGrant, Registration};
use crate::models::User;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Header that carries the credential on protected requests
const TOKEN_HEADER: &str = "token";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) data requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of a successful login or registration. The service has been seen to
/// answer 200 without a token, which counts as a failed login.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
    user: Option<User>,
}

impl AuthResponse {
    fn into_grant(self) -> Result<LoginGrant, ApiError> {
        match (self.token, self.user) {
            (Some(token), Some(user)) if !token.is_empty() => Ok(LoginGrant {
                credential: Credential::new(token),
                user,
            }),
            _ => Err(ApiError::InvalidResponse(
                "Login response did not include a token and user".to_string(),
            )),
        }
    }
}

/// API client for the CareBridge service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Credential>,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url` (e.g. `http://localhost:5000/api`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given credential, sharing the connection pool.
    pub fn with_token(&self, credential: Credential) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(credential),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token_header(credential: &Credential) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        let value = header::HeaderValue::from_str(credential.as_str())
            .map_err(|_| ApiError::InvalidCredential)?;
        headers.insert(TOKEN_HEADER, value);
        Ok(headers)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        match self.token {
            Some(ref credential) => Self::token_header(credential),
            None => Ok(header::HeaderMap::new()),
        }
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    /// Send an authenticated request, retrying rate-limited responses with
    /// exponential backoff.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<(reqwest::Response, String), ApiError> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .headers(self.auth_headers()?);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok((response, url)),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[]).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let (response, url) = self.send::<()>(Method::GET, path, query, None).await?;
        Self::parse_json(response, &url).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let (response, url) = self.send(Method::POST, path, &[], Some(body)).await?;
        Self::parse_json(response, &url).await
    }

    /// Send a request whose response body carries nothing the caller needs
    pub(crate) async fn send_discarding<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let (response, url) = self.send(method, path, &[], body).await?;
        // Drain the body so the connection can be reused
        let _ = response.bytes().await;
        debug!(url = %url, "Request succeeded");
        Ok(())
    }

    async fn authenticate<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<LoginGrant, ApiError> {
        let url = self.url(path);
        let response = self.client.post(&url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        let auth: AuthResponse = Self::parse_json(response, &url).await?;
        auth.into_grant()
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn verify(&self, credential: &Credential) -> Result<Option<User>, ApiError> {
        let url = self.url("/auth/is-verify");
        let response = self
            .client
            .get(&url)
            .headers(Self::token_header(credential)?)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Credential verification rejected");
            return Ok(None);
        }

        Self::parse_json(response, &url).await.map(Some)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
        self.authenticate("/auth/login", &LoginRequest { email, password })
            .await
    }

    async fn register(&self, registration: &Registration) -> Result<LoginGrant, ApiError> {
        self.authenticate("/auth/register", registration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/api/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/children"), "http://localhost:5000/api/children");
    }

    #[test]
    fn test_auth_response_into_grant() {
        let json = r#"{"token": "T1", "user": {"user_id": 1, "name": "Ana", "email": "ana@example.com", "role": "parent"}}"#;
        let auth: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth JSON");
        let grant = auth.into_grant().expect("grant");
        assert_eq!(grant.credential, Credential::new("T1"));
        assert_eq!(grant.user.role, Role::Parent);
    }

    #[test]
    fn test_auth_response_without_token_is_invalid() {
        let json = r#"{"user": {"user_id": 1, "name": "Ana", "email": "ana@example.com", "role": "parent"}}"#;
        let auth: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth JSON");
        assert!(matches!(auth.into_grant(), Err(ApiError::InvalidResponse(_))));

        let json = r#"{"token": "", "user": null}"#;
        let auth: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth JSON");
        assert!(auth.into_grant().is_err());
    }

    #[test]
    fn test_token_header() {
        let headers = ApiClient::token_header(&Credential::new("abc.def")).expect("header");
        assert_eq!(headers.get("token").and_then(|v| v.to_str().ok()), Some("abc.def"));
        assert!(matches!(
            ApiClient::token_header(&Credential::new("bad\nvalue")),
            Err(ApiError::InvalidCredential)
        ));
    }

    #[test]
    fn test_unauthenticated_client_sends_no_token() {
        let client = ApiClient::new(DEFAULT_API_URL).expect("client");
        assert!(client.auth_headers().expect("headers").is_empty());
        let authed = client.with_token(Credential::new("T1"));
        assert!(authed.auth_headers().expect("headers").contains_key("token"));
    }
}
