use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Credential cannot be sent as a request header")]
    InvalidCredential,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Reduce an error body to the human-readable message it carries.
    ///
    /// The service answers rejections with a bare JSON string
    /// (`"Password or Email is incorrect"`), an object with a `message` or
    /// `error` field, or plain text.
    pub fn extract_message(body: &str) -> String {
        let trimmed = body.trim();
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::String(s)) => s.trim().to_string(),
            Ok(serde_json::Value::Object(map)) => ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| trimmed.to_string()),
            _ => trimmed.to_string(),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::truncate_body(&Self::extract_message(body));
        match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            code => ApiError::Rejected {
                status: code,
                message,
            },
        }
    }

    /// The message the server attached to a rejection, if any
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ApiError::Unauthorized(m)
            | ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::ServerError(m)
            | ApiError::Rejected { message: m, .. } => m.as_str(),
            _ => return None,
        };
        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_extract_message_json_string() {
        assert_eq!(
            ApiError::extract_message("\"Password or Email is incorrect\""),
            "Password or Email is incorrect"
        );
    }

    #[test]
    fn test_extract_message_json_object() {
        assert_eq!(ApiError::extract_message(r#"{"message": "User not found"}"#), "User not found");
        assert_eq!(ApiError::extract_message(r#"{"error": "Not Authorize"}"#), "Not Authorize");
        assert_eq!(ApiError::extract_message(r#"{"code": 7}"#), r#"{"code": 7}"#);
    }

    #[test]
    fn test_extract_message_plain_text() {
        assert_eq!(ApiError::extract_message("  Server Error \n"), "Server Error");
        assert_eq!(ApiError::extract_message(""), "");
    }

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "\"bad\""),
            ApiError::Unauthorized(m) if m == "bad"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "down"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "Missing Credentials"),
            ApiError::Rejected { status: 400, .. }
        ));
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            ApiError::Unauthorized("Invalid Credential".to_string()).server_message(),
            Some("Invalid Credential")
        );
        assert_eq!(ApiError::Unauthorized(String::new()).server_message(), None);
        assert_eq!(ApiError::RateLimited.server_message(), None);
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        match ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body) {
            ApiError::ServerError(m) => assert!(m.contains("truncated")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
