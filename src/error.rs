//! Error types for Foreman API operations.

use thiserror::Error;

/// Errors that can occur during Foreman API operations.
#[derive(Debug, Error)]
pub enum ForemanError {
    /// Configuration is missing or incomplete.
    #[error("Foreman configuration required: {0}")]
    ConfigMissing(String),

    /// The HTTP method is not one the API accepts.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// No entity matched a lookup.
    #[error("{entity_type} '{query}' not found")]
    NotFound {
        entity_type: &'static str,
        query: String,
    },

    /// A lookup that must be unique matched several entities.
    #[error("{entity_type} '{query}' matched {count} entries, expected exactly one")]
    AmbiguousMatch {
        entity_type: &'static str,
        query: String,
        count: usize,
    },

    /// The server answered with a non-2xx status.
    #[error("Foreman API error: HTTP {status_code} from {endpoint}: {body}")]
    Api {
        endpoint: String,
        status_code: u16,
        body: String,
    },

    /// HTTP transport error (connect, TLS, DNS, timeout).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The status line arrived but the body could not be read.
    #[error("Failed to read response body (HTTP {status_code}): {source}")]
    BodyRead {
        status_code: u16,
        #[source]
        source: reqwest::Error,
    },

    /// JSON encoding or decoding error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A header value could not be built from configuration.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// An async task was still pending after every poll attempt.
    #[error("Timed out waiting for task '{task_id}' after {attempts} attempts")]
    TaskTimeout { task_id: String, attempts: u32 },
}

impl ForemanError {
    /// HTTP status associated with the error, if a response was received.
    ///
    /// `None` means the request never produced a status line.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } | Self::BodyRead { status_code, .. } => {
                Some(*status_code)
            }
            Self::HttpError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure happened on the wire rather than in the API.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::BodyRead { .. })
    }

    /// Whether the request was rejected before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidMethod(_)
                | Self::ConfigMissing(_)
                | Self::UrlError(_)
                | Self::InvalidHeader(_)
        )
    }

    /// Human-readable message from a Foreman error body.
    ///
    /// Foreman reports failures as `{"error": {"message": "..."}}` or
    /// `{"error": {"full_messages": [...]}}`. Falls back to the raw body.
    pub fn server_message(&self) -> Option<String> {
        let Self::Api { body, .. } = self else {
            return None;
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            let error = json.get("error").unwrap_or(&json);
            if let Some(msg) = error.get("message").and_then(|m| m.as_str()) {
                return Some(msg.to_string());
            }
            if let Some(messages) = error.get("full_messages").and_then(|m| m.as_array()) {
                let joined: Vec<&str> = messages.iter().filter_map(|m| m.as_str()).collect();
                if !joined.is_empty() {
                    return Some(joined.join("; "));
                }
            }
        }

        Some(body.clone())
    }
}

/// Result type alias for Foreman operations.
pub type Result<T> = core::result::Result<T, ForemanError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(body: &str) -> ForemanError {
        ForemanError::Api {
            endpoint: "/api/domains".to_string(),
            status_code: 422,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_api_error_display_contains_status_and_body() {
        let text = api_error("boom").to_string();
        assert!(text.contains("422"));
        assert!(text.contains("boom"));
        assert!(text.contains("/api/domains"));
    }

    #[test]
    fn test_server_message_extracts_nested_message() {
        let err = api_error(r#"{"error": {"id": 1, "message": "Name has already been taken"}}"#);
        assert_eq!(
            err.server_message().as_deref(),
            Some("Name has already been taken")
        );
    }

    #[test]
    fn test_server_message_joins_full_messages() {
        let err = api_error(r#"{"error": {"full_messages": ["Name can't be blank", "Mac is invalid"]}}"#);
        assert_eq!(
            err.server_message().as_deref(),
            Some("Name can't be blank; Mac is invalid")
        );
    }

    #[test]
    fn test_server_message_falls_back_to_raw_body() {
        let err = api_error("<html>Bad Gateway</html>");
        assert_eq!(err.server_message().as_deref(), Some("<html>Bad Gateway</html>"));
    }

    #[test]
    fn test_classification() {
        assert!(ForemanError::InvalidMethod("CONNECT".into()).is_validation());
        assert!(!api_error("x").is_validation());
        assert!(!api_error("x").is_transport());
        assert_eq!(api_error("x").status_code(), Some(422));

        let timeout = ForemanError::TaskTimeout {
            task_id: "abc".into(),
            attempts: 3,
        };
        assert_eq!(timeout.status_code(), None);
        assert!(timeout.to_string().contains("abc"));
    }
}
