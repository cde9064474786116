use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alacrity_domain::{ClientConfig, DestroyBehavior, ReauthMode};
use alacrity_infra::api::{ApiError, Credentials, SimpleTokenProvider, Transport};
use alacrity_infra::http::HttpClient;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PASSWORD: &str = "captain42";

/// Token provider whose credential requests are counted.
pub struct CountingProvider {
    pub provider: Arc<SimpleTokenProvider>,
    calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn new(seed_token: Option<&str>) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut provider = SimpleTokenProvider::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok::<_, ApiError>(Credentials::new(PASSWORD)) })
        });
        if let Some(token) = seed_token {
            provider = provider.with_token(token);
        }
        Self { provider: Arc::new(provider), calls }
    }

    pub fn credential_requests(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn envelope(status: i64, description: &str, data: Value) -> Value {
    json!({ "status": status, "description": description, "data": data })
}

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(100, "OK", data))
}

pub fn status(code: i64, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": code, "description": description }))
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
}

pub fn transport_with(
    server: &MockServer,
    provider: Arc<SimpleTokenProvider>,
    destroy_behavior: DestroyBehavior,
    reauth_mode: ReauthMode,
) -> Transport {
    let mut config = config_for(server);
    config.destroy_behavior = destroy_behavior;
    config.reauth_mode = reauth_mode;

    let http = HttpClient::builder().no_proxy().build().expect("http client");
    Transport::builder()
        .config(config)
        .token_provider(provider)
        .http_client(http)
        .build()
        .expect("transport")
}

pub fn transport(server: &MockServer, provider: Arc<SimpleTokenProvider>) -> Transport {
    transport_with(server, provider, DestroyBehavior::Suppress, ReauthMode::PerRequest)
}

/// Mount a login endpoint that accepts [`PASSWORD`] and issues `token`.
pub async fn mount_login(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({ "password": PASSWORD })))
        .respond_with(ok(json!({ "token": token })))
        .expect(expected_calls)
        .mount(server)
        .await;
}
