//! Token management
//!
//! The transport never stores a token itself. It asks a [`TokenProvider`]
//! for the current token before each attempt, for fresh credentials when the
//! server rejects the token, and hands the token returned by a successful
//! login back to the provider.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use super::errors::ApiError;

/// Login credentials
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Account password
    pub password: String,
    /// One-time password when two-factor auth is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_token: Option<String>,
}

impl Credentials {
    /// Credentials without a one-time password
    pub fn new(password: impl Into<String>) -> Self {
        Self { password: password.into(), otp_token: None }
    }

    /// Attach a one-time password
    #[must_use]
    pub fn with_otp(mut self, otp_token: impl Into<String>) -> Self {
        self.otp_token = Some(otp_token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("otp_token", &self.otp_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source and sink of auth tokens
///
/// Implementations must be safe to call concurrently; every in-flight call
/// reads the token independently.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Token to attach to the next attempt, `None` when not logged in
    async fn current_token(&self) -> Result<Option<String>, ApiError>;

    /// Credentials for a fresh login
    async fn request_credentials(&self) -> Result<Credentials, ApiError>;

    /// Called with the token returned by a successful login
    async fn token_updated(&self, token: String) -> Result<(), ApiError>;
}

type CredentialsFn = dyn Fn() -> BoxFuture<'static, Result<Credentials, ApiError>> + Send + Sync;

/// In-memory token provider backed by a credentials callback
pub struct SimpleTokenProvider {
    token: RwLock<Option<String>>,
    credentials: Box<CredentialsFn>,
}

impl SimpleTokenProvider {
    /// Provider asking `credentials` for a login whenever one is needed
    pub fn new<F>(credentials: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<Credentials, ApiError>> + Send + Sync + 'static,
    {
        Self { token: RwLock::new(None), credentials: Box::new(credentials) }
    }

    /// Provider that always logs in with a fixed password
    pub fn with_password(password: impl Into<String>) -> Self {
        let credentials = Arc::new(Credentials::new(password));
        Self::new(move || {
            let credentials = Arc::clone(&credentials);
            Box::pin(async move { Ok((*credentials).clone()) })
        })
    }

    /// Seed an already known token
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write() = Some(token.into());
        self
    }

    /// Token currently held, if any
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

impl fmt::Debug for SimpleTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleTokenProvider")
            .field("has_token", &self.token.read().is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for SimpleTokenProvider {
    async fn current_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.token.read().clone().filter(|token| !token.is_empty()))
    }

    async fn request_credentials(&self) -> Result<Credentials, ApiError> {
        (self.credentials)().await
    }

    async fn token_updated(&self, token: String) -> Result<(), ApiError> {
        debug!("storing refreshed auth token");
        *self.token.write() = Some(token);
        Ok(())
    }
}
