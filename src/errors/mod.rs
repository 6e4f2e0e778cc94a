//! Error handling module for the warranty admin client.
//!
//! Every failure a view can see falls into one of three families: validation
//! (caught before any request is sent), network (the request never reached the
//! server) and server-rejected (an HTTP error status). The remaining variants
//! cover local failures such as a corrupt session file.

use serde::Deserialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const SESSION_ERROR: &str = "SESSION_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const RENDER_ERROR: &str = "RENDER_ERROR";
}

/// Message shown when a request could not reach the backend at all.
pub const CANNOT_CONNECT: &str = "Cannot connect to the server. Please check your connection.";

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Form input rejected locally, before any network call
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request never reached the server (connect failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a 4xx/5xx status
    #[error("Server rejected request with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
        error_code: Option<String>,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Missing or unreadable session
    #[error("Session error: {0}")]
    Session(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record id not present in the loaded collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// A view panicked while rendering
    #[error("Failed to render view: {0}")]
    Render(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Server { status: 401, .. } => codes::UNAUTHORIZED,
            ClientError::Server { .. } => codes::SERVER_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Session(_) => codes::SESSION_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Render(_) => codes::RENDER_ERROR,
        }
    }

    /// Message suitable for showing to the person operating the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(errors) => {
                let fields = field_messages(errors)
                    .into_iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect::<Vec<_>>();
                format!("Please fix the highlighted fields ({})", fields.join("; "))
            }
            ClientError::Network(_) => CANNOT_CONNECT.to_string(),
            ClientError::Server {
                status,
                message,
                error_code,
            } => message
                .clone()
                .or_else(|| error_code.clone())
                .unwrap_or_else(|| match status {
                    401 => "Your session has expired. Please log in again.".to_string(),
                    403 => "You do not have permission to perform this action.".to_string(),
                    _ => format!("Request failed with status {}", status),
                }),
            other => other.to_string(),
        }
    }

    /// Whether an idempotent request may be retried after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Build a server error from a status code and the raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ServerErrorBody>(body).unwrap_or_default();
        ClientError::Server {
            status,
            message: parsed.message.or(parsed.error).filter(|m| !m.trim().is_empty()),
            error_code: parsed.error_code.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Response decode error: {:?}", err);
            return ClientError::Decode(err.to_string());
        }
        tracing::error!("Transport error: {:?}", err);
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

/// Error body the backend sends with 4xx/5xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

/// Flatten validation errors into `(field, message)` pairs for inline display.
///
/// Struct-level checks (date ranges) report under the field named in their
/// error code's `field` param when present.
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                let field = e
                    .params
                    .get("field")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| field.to_string());
                (field, message)
            })
        })
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_server_error_prefers_message() {
        let err = ClientError::from_response(
            400,
            r#"{"message":"Code already exists","errorCode":"DUPLICATE_CODE"}"#,
        );
        assert_eq!(err.user_message(), "Code already exists");
        assert_eq!(err.error_code(), codes::SERVER_ERROR);
    }

    #[test]
    fn test_server_error_falls_back_to_error_code() {
        let err = ClientError::from_response(409, r#"{"errorCode":"DUPLICATE_VIN"}"#);
        assert_eq!(err.user_message(), "DUPLICATE_VIN");
    }

    #[test]
    fn test_server_error_generic_fallback() {
        let err = ClientError::from_response(500, "<html>oops</html>");
        assert_eq!(err.user_message(), "Request failed with status 500");
        assert!(err.is_retryable());

        let err = ClientError::from_response(401, "");
        assert_eq!(err.error_code(), codes::UNAUTHORIZED);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_network_error_message() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), CANNOT_CONNECT);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_field_messages() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("vin_format");
        error.message = Some("VIN must be 17 characters".into());
        errors.add("vin", error);

        let messages = field_messages(&errors);
        assert_eq!(
            messages,
            vec![("vin".to_string(), "VIN must be 17 characters".to_string())]
        );

        let err = ClientError::Validation(errors);
        assert!(err.user_message().contains("vin: VIN must be 17 characters"));
        assert!(!err.is_retryable());
    }
}
