//! Conversions from external infrastructure errors into API errors.

use reqwest::Error as HttpError;

use crate::api::ApiError;

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        if err.is_timeout() {
            return ApiError::Network("HTTP request timed out".into());
        }

        if err.is_builder() {
            return ApiError::InvalidRequest(format!("failed to build HTTP request: {err}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if err.is_connect() {
            return ApiError::Network(format!("HTTP connection failure: {err}"));
        }

        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }

        if let Some(status) = err.status() {
            return ApiError::Http {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        ApiError::Network(err.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
