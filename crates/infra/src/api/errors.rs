//! API-specific error types
//!
//! Two tiers: transport failures (non-2xx responses, connection problems,
//! undecodable bodies) and application failures (an envelope whose status
//! is outside the success family).

use std::time::Duration;

use alacrity_domain::{AlacrityError, EnvelopeStatus};
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Token rejected, wrong password, not authorized
    Authentication,
    /// Resource does not exist
    NotFound,
    /// Resource already exists
    Conflict,
    /// Bad names, illegal parameters or operations
    Validation,
    /// App build failed
    Build,
    /// Server-side failure (5xx or generic application error)
    Server,
    /// Connection, timeout, decoding or non-2xx client responses
    Transport,
    /// Client misconfiguration or malformed request
    Config,
    /// Call settled because the client was destroyed
    Cancelled,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx HTTP response
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Envelope status outside the success family; the message is the
    /// server's description
    #[error("{description}")]
    Application { status: EnvelopeStatus, description: String },

    /// Connection failure
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the client timeout
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Response body is not what was expected
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Token provider could not supply credentials
    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    /// Client misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Call settled because the client was destroyed
    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Build the application error for a non-success envelope
    pub fn from_envelope(status: EnvelopeStatus, description: impl Into<String>) -> Self {
        Self::Application { status, description: description.into() }
    }

    /// Envelope status code of an application error
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::Application { status, .. } => Some(status.code()),
            _ => None,
        }
    }

    /// HTTP status of a transport-level error
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the auth token
    pub fn is_token_invalid(&self) -> bool {
        matches!(self, Self::Application { status, .. } if status.is_token_invalid())
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Application { status, .. } => match *status {
                EnvelopeStatus::AUTH_TOKEN_INVALID
                | EnvelopeStatus::ERROR_NOT_AUTHORIZED
                | EnvelopeStatus::WRONG_PASSWORD
                | EnvelopeStatus::AUTHENTICATION_FAILED
                | EnvelopeStatus::PASSWORD_BACK_OFF
                | EnvelopeStatus::VERIFICATION_FAILED
                | EnvelopeStatus::ERROR_USER_NOT_INITIALIZED => ApiErrorCategory::Authentication,
                EnvelopeStatus::NOT_FOUND => ApiErrorCategory::NotFound,
                EnvelopeStatus::ERROR_ALREADY_EXIST => ApiErrorCategory::Conflict,
                EnvelopeStatus::ERROR_BAD_NAME
                | EnvelopeStatus::ILLEGAL_PARAMETER
                | EnvelopeStatus::ILLEGAL_OPERATION => ApiErrorCategory::Validation,
                EnvelopeStatus::BUILD_ERROR => ApiErrorCategory::Build,
                _ => ApiErrorCategory::Server,
            },
            Self::Http { status, .. } => match *status {
                401 | 403 => ApiErrorCategory::Authentication,
                404 => ApiErrorCategory::NotFound,
                500..=599 => ApiErrorCategory::Server,
                _ => ApiErrorCategory::Transport,
            },
            Self::Network(_) | Self::Timeout(_) | Self::Decode(_) => ApiErrorCategory::Transport,
            Self::Credentials(_) => ApiErrorCategory::Authentication,
            Self::InvalidRequest(_) | Self::Config(_) => ApiErrorCategory::Config,
            Self::Cancelled => ApiErrorCategory::Cancelled,
        }
    }
}

impl From<AlacrityError> for ApiError {
    fn from(err: AlacrityError) -> Self {
        match err {
            AlacrityError::Config(message) => Self::Config(message),
            AlacrityError::InvalidInput(message) => Self::InvalidRequest(message),
            AlacrityError::Serialization(message) => Self::Decode(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_carries_code_and_description() {
        let err = ApiError::from_envelope(EnvelopeStatus(1103), "App already exists");

        assert_eq!(err.status_code(), Some(1103));
        assert_eq!(err.to_string(), "App already exists");
        assert_eq!(err.category(), ApiErrorCategory::Conflict);
        assert!(!err.is_token_invalid());
    }

    #[test]
    fn test_http_error_message_embeds_status_and_body() {
        let err = ApiError::Http { status: 502, body: "bad gateway".into() };

        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        assert_eq!(err.http_status(), Some(502));
        assert_eq!(err.status_code(), None);
        assert_eq!(err.category(), ApiErrorCategory::Server);
    }

    #[test]
    fn test_error_categories() {
        assert!(ApiError::from_envelope(EnvelopeStatus::AUTH_TOKEN_INVALID, "").is_token_invalid());
        assert_eq!(
            ApiError::from_envelope(EnvelopeStatus::WRONG_PASSWORD, "").category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::from_envelope(EnvelopeStatus::NOT_FOUND, "").category(),
            ApiErrorCategory::NotFound
        );
        assert_eq!(
            ApiError::from_envelope(EnvelopeStatus(4321), "").category(),
            ApiErrorCategory::Server
        );
        assert_eq!(
            ApiError::Http { status: 401, body: String::new() }.category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::Http { status: 418, body: String::new() }.category(),
            ApiErrorCategory::Transport
        );
        assert_eq!(ApiError::Timeout(Duration::from_secs(1)).category(), ApiErrorCategory::Transport);
        assert_eq!(ApiError::Cancelled.category(), ApiErrorCategory::Cancelled);
    }

    #[test]
    fn test_domain_errors_convert() {
        let err: ApiError = AlacrityError::Config("missing base_domain".into()).into();
        assert!(matches!(err, ApiError::Config(msg) if msg == "missing base_domain"));
    }
}
