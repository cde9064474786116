//! Request transport with re-authentication and destroy suppression
//!
//! [`Transport::issue`] turns an [`ApiRequest`] into an authenticated HTTP
//! call, unwraps the response envelope, re-authenticates once when the
//! server rejects the token, and withholds results once the transport has
//! been destroyed.

use std::future::Future;
use std::sync::Arc;

use alacrity_domain::{ClientConfig, DestroyBehavior, Envelope, ReauthMode};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::auth::{Credentials, TokenProvider};
use super::errors::ApiError;
use super::request::{ApiRequest, HeaderConfig, Payload, Verb};
use crate::http::HttpClient;

/// Authenticated request transport
pub struct Transport {
    http: HttpClient,
    base_url: String,
    login_endpoint: String,
    headers: HeaderConfig,
    tokens: Arc<dyn TokenProvider>,
    destroy_behavior: DestroyBehavior,
    reauth_mode: ReauthMode,
    lifecycle: CancellationToken,
    reauth_gate: Mutex<()>,
}

impl Transport {
    /// Create a transport for `config`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid or the
    /// HTTP client cannot be built
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        Self::builder().config(config.clone()).token_provider(tokens).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// `<base_domain><api_path>`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token source used for every request
    pub fn token_provider(&self) -> &Arc<dyn TokenProvider> {
        &self.tokens
    }

    /// Configured delivery after destroy
    pub fn destroy_behavior(&self) -> DestroyBehavior {
        self.destroy_behavior
    }

    /// Configured re-authentication coordination
    pub fn reauth_mode(&self) -> ReauthMode {
        self.reauth_mode
    }

    /// Tear the transport down
    ///
    /// Results of calls still in flight, and of any later call, are no
    /// longer delivered. Idempotent.
    pub fn destroy(&self) {
        if !self.lifecycle.is_cancelled() {
            info!(behavior = %self.destroy_behavior, "destroying transport");
        }
        self.lifecycle.cancel();
    }

    /// Whether [`destroy`](Self::destroy) has been called
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_cancelled()
    }

    /// Issue a request and resolve to the envelope's `data`
    ///
    /// A token-invalid response triggers one login and one retry. Other
    /// non-success statuses become `ApiError::Application`.
    ///
    /// # Errors
    ///
    /// Transport failures, application errors, or `ApiError::Cancelled`
    /// after [`destroy`](Self::destroy) in `DestroyBehavior::Cancel` mode
    #[instrument(skip(self, request), fields(verb = %request.verb(), endpoint = %request.endpoint()))]
    pub async fn issue(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let outcome = self.guard(self.execute(request)).await;
        self.deliver(outcome).await
    }

    /// Exchange `credentials` for a token and hand it to the token provider
    ///
    /// Never re-authenticates on its own; a token-invalid answer is returned
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns the login failure, or `ApiError::Decode` if the response
    /// carries no token
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let outcome = self.guard(self.exchange_credentials(credentials)).await;
        self.deliver(outcome).await
    }

    /// Race `work` against destroy when destroy settles calls
    async fn guard<F, T>(&self, work: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        match self.destroy_behavior {
            DestroyBehavior::Suppress => work.await,
            DestroyBehavior::Cancel => {
                tokio::select! {
                    biased;
                    () = self.lifecycle.cancelled() => Err(ApiError::Cancelled),
                    result = work => result,
                }
            }
        }
    }

    async fn deliver<T>(&self, outcome: Result<T, ApiError>) -> Result<T, ApiError> {
        if !self.lifecycle.is_cancelled() {
            return outcome;
        }

        match self.destroy_behavior {
            DestroyBehavior::Suppress => {
                debug!("transport destroyed; withholding result");
                std::future::pending().await
            }
            DestroyBehavior::Cancel => Err(ApiError::Cancelled),
        }
    }

    async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        request.validate()?;

        let (mut envelope, sent_token) = self.send_once(request).await?;

        if envelope.status().is_token_invalid() && !self.is_login_request(request) {
            warn!(endpoint = %request.endpoint(), "auth token rejected; re-authenticating");
            self.reauthenticate(sent_token.as_deref()).await?;
            envelope = self.send_once(request).await?.0;
        }

        envelope
            .into_result()
            .map_err(|(status, description)| ApiError::from_envelope(status, description))
    }

    /// The login exchange never re-authenticates, whoever issues it
    fn is_login_request(&self, request: &ApiRequest) -> bool {
        request.verb() == Verb::Post && request.endpoint() == self.login_endpoint
    }

    /// One HTTP attempt; returns the envelope and the token it was sent with
    async fn send_once(
        &self,
        request: &ApiRequest,
    ) -> Result<(Envelope, Option<String>), ApiError> {
        let token = self.tokens.current_token().await?.filter(|token| !token.is_empty());
        let headers = self.headers.build(token.as_deref())?;
        let url = request.url(&self.base_url);

        let builder = self.http.request(request.verb().method(), &url).headers(headers);
        let builder = match (request.verb(), request.payload()) {
            (_, Payload::Multipart(parts)) => builder.multipart(Payload::to_form(parts)?),
            (Verb::Get, _) => builder.header(CONTENT_TYPE, "application/json"),
            (Verb::Post, Payload::Fields(fields)) => builder.json(fields),
            (Verb::Post, Payload::Empty) => builder.json(&Map::<String, Value>::new()),
        };

        let response = self.http.send(builder).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(|err| self.body_error(&err))?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            return Err(ApiError::Http { status: status.as_u16(), body });
        }

        let envelope: Envelope = serde_json::from_slice(&body)
            .map_err(|err| ApiError::Decode(format!("response is not an envelope: {err}")))?;
        debug!(status = %envelope.status(), "received envelope");

        Ok((envelope, token))
    }

    fn body_error(&self, err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.http.timeout())
        } else {
            ApiError::Network(format!("failed to read response body: {err}"))
        }
    }

    async fn reauthenticate(&self, rejected: Option<&str>) -> Result<(), ApiError> {
        match self.reauth_mode {
            ReauthMode::PerRequest => self.login_with_fresh_credentials().await,
            ReauthMode::Shared => {
                let _gate = self.reauth_gate.lock().await;

                let current = self.tokens.current_token().await?;
                if current.as_deref().is_some_and(|token| Some(token) != rejected) {
                    debug!("token already replaced by a concurrent login");
                    return Ok(());
                }

                self.login_with_fresh_credentials().await
            }
        }
    }

    async fn login_with_fresh_credentials(&self) -> Result<(), ApiError> {
        let credentials = self.tokens.request_credentials().await?;
        self.exchange_credentials(&credentials).await
    }

    async fn exchange_credentials(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let request = ApiRequest::post(self.login_endpoint.as_str()).with_json(credentials)?;

        let (envelope, _) = self.send_once(&request).await?;
        let data = envelope
            .into_result()
            .map_err(|(status, description)| ApiError::from_envelope(status, description))?;

        let token = data
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Decode("login response carries no token".into()))?;

        self.tokens.token_updated(token.to_owned()).await?;
        info!("logged in");
        Ok(())
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("login_endpoint", &self.login_endpoint)
            .field("destroy_behavior", &self.destroy_behavior)
            .field("reauth_mode", &self.reauth_mode)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Transport`]
#[derive(Default)]
pub struct TransportBuilder {
    config: Option<ClientConfig>,
    tokens: Option<Arc<dyn TokenProvider>>,
    http: Option<HttpClient>,
    headers: Option<HeaderConfig>,
}

impl TransportBuilder {
    /// Client configuration (required)
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Token source (required)
    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Use a preconfigured HTTP client instead of one built from the config
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Override the default header names
    pub fn headers(mut self, headers: HeaderConfig) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Build the transport
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the config or token provider is missing,
    /// the config is invalid, or the HTTP client cannot be built
    pub fn build(self) -> Result<Transport, ApiError> {
        let config = self.config.ok_or_else(|| ApiError::Config("Client config not set".into()))?;
        let tokens =
            self.tokens.ok_or_else(|| ApiError::Config("Token provider not set".into()))?;
        config.validate()?;

        let http = match self.http {
            Some(http) => http,
            None => HttpClient::builder()
                .timeout(config.timeout())
                .user_agent(config.user_agent.clone())
                .build()?,
        };

        Ok(Transport {
            http,
            base_url: config.base_url(),
            login_endpoint: config.login_endpoint,
            headers: self.headers.unwrap_or_default(),
            tokens,
            destroy_behavior: config.destroy_behavior,
            reauth_mode: config.reauth_mode,
            lifecycle: CancellationToken::new(),
            reauth_gate: Mutex::new(()),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::auth::SimpleTokenProvider;

    fn transport(server: &MockServer, tokens: Arc<dyn TokenProvider>) -> Transport {
        let config = ClientConfig::new(server.uri());
        let http = HttpClient::builder().no_proxy().build().unwrap();
        Transport::builder().config(config).token_provider(tokens).http_client(http).build().unwrap()
    }

    #[test]
    fn test_builder_missing_token_provider() {
        let result = Transport::builder().config(ClientConfig::new("https://x.example")).build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let tokens: Arc<dyn TokenProvider> = Arc::new(SimpleTokenProvider::with_password("pw"));
        let result = Transport::new(&ClientConfig::new("alacran.example.com"), tokens);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn test_issue_resolves_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user/system/info"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": 100, "description": "OK", "data": {"rootDomain": "x.io"}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, Arc::new(SimpleTokenProvider::with_password("pw")));
        let data = transport.issue(&ApiRequest::get("/user/system/info")).await.unwrap();

        assert_eq!(data, json!({"rootDomain": "x.io"}));
    }

    #[tokio::test]
    async fn test_post_without_payload_sends_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/user/system/selfhostregistry/enableregistry"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 100})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport(&server, Arc::new(SimpleTokenProvider::with_password("pw")));
        let data = transport
            .issue(&ApiRequest::post("/user/system/selfhostregistry/enableregistry"))
            .await
            .unwrap();

        assert_eq!(data, Value::Null);
    }

    #[tokio::test]
    async fn test_non_envelope_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let transport = transport(&server, Arc::new(SimpleTokenProvider::with_password("pw")));
        let err = transport.issue(&ApiRequest::get("/x")).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .and(body_json(json!({"password": "pw", "otpToken": "000111"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"status": 100, "description": "", "data": {"token": "fresh"}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(SimpleTokenProvider::with_password("pw"));
        let transport = transport(&server, tokens.clone());
        transport.login(&Credentials::new("pw").with_otp("000111")).await.unwrap();

        assert_eq!(tokens.token().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_login_without_token_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 100, "data": {}})))
            .mount(&server)
            .await;

        let tokens = Arc::new(SimpleTokenProvider::with_password("pw"));
        let transport = transport(&server, tokens.clone());
        let err = transport.login(&Credentials::new("pw")).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(tokens.token(), None);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_sending() {
        let server = MockServer::start().await;
        let transport = transport(&server, Arc::new(SimpleTokenProvider::with_password("pw")));

        let err = transport.issue(&ApiRequest::get("")).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_body_timeout_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)))
            .mount(&server)
            .await;

        let timeout = std::time::Duration::from_millis(50);
        let http = HttpClient::builder().no_proxy().timeout(timeout).build().unwrap();
        let transport = Transport::builder()
            .config(ClientConfig::new(server.uri()))
            .token_provider(Arc::new(SimpleTokenProvider::with_password("pw")))
            .http_client(http)
            .build()
            .unwrap();

        let err = reqwest::Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap()
            .get(server.uri())
            .send()
            .await
            .unwrap_err();

        assert!(matches!(transport.body_error(&err), ApiError::Timeout(t) if t == timeout));
    }

    #[tokio::test]
    async fn test_non_2xx_body_is_kept_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let transport = transport(&server, Arc::new(SimpleTokenProvider::with_password("pw")));
        let err = transport.issue(&ApiRequest::post("/user/system/info")).await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP 503: upstream down");
    }

    #[test]
    fn test_destroy_is_monotonic() {
        let tokens: Arc<dyn TokenProvider> = Arc::new(SimpleTokenProvider::with_password("pw"));
        let transport = Transport::new(&ClientConfig::new("https://x.example"), tokens).unwrap();

        assert!(!transport.is_destroyed());
        transport.destroy();
        transport.destroy();
        assert!(transport.is_destroyed());
    }
}
