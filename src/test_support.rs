use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::clients::BackendClient;
use crate::core::{
    config::Settings,
    security::{Claims, Session},
    state::AppState,
};
use crate::models::types::Role;

const TEST_TOKEN_SECRET: &str = "test-session-secret";

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("ADVISING_ENV", "test");
    std::env::set_var("ADVISING_STRICT_CONFIG", "0");
    std::env::set_var("SESSION_TOKEN_SECRET", TEST_TOKEN_SECRET);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::set_var("FEEDBACK_FETCH_CONCURRENCY", "4");
    std::env::remove_var("SESSION_TOKEN_ALGORITHM");
    std::env::remove_var("BACKEND_BASE_URL");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("VAPID_PUBLIC_KEY");
    std::env::remove_var("API_V1_STR");
    std::env::remove_var("PROJECT_NAME");
}

/// In-process stand-in for the upstream REST backend.
pub(crate) struct StubBackend {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl StubBackend {
    pub(crate) async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub backend");
        });
        Self { addr, handle }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn client(&self) -> BackendClient {
        BackendClient::new(&self.base_url(), Duration::from_secs(5), Duration::from_secs(2))
            .expect("stub client")
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub(crate) fn state_for(settings: Settings, base_url: &str) -> AppState {
    let backend = BackendClient::new(base_url, Duration::from_secs(5), Duration::from_secs(2))
        .expect("backend client");
    AppState::new(settings, backend)
}

/// Gateway router wired to a stub backend, holding the env lock for the test's lifetime.
pub(crate) struct TestContext {
    pub(crate) app: Router,
    pub(crate) settings: Settings,
    _stub: StubBackend,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn setup_test_context(upstream: Router) -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let stub = StubBackend::spawn(upstream).await;
    let app = api::router::router(state_for(settings.clone(), &stub.base_url()));

    TestContext { app, settings, _stub: stub, _guard: guard }
}

pub(crate) fn token_with_secret(user_id: &str, role: Option<&str>, secret: &str) -> String {
    let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
    sign(user_id, role, exp, secret)
}

pub(crate) fn session_token(user_id: &str, role: Option<&str>, settings: &Settings) -> String {
    let secret = settings.security().token_secret.as_deref().expect("test token secret");
    token_with_secret(user_id, role, secret)
}

pub(crate) fn expired_token(user_id: &str, settings: &Settings) -> String {
    let secret = settings.security().token_secret.as_deref().expect("test token secret");
    let exp = OffsetDateTime::now_utc().unix_timestamp() - 3600;
    sign(user_id, Some("student"), exp, secret)
}

fn sign(user_id: &str, role: Option<&str>, exp: i64, secret: &str) -> String {
    let claims = Claims {
        user_id: Some(user_id.to_string()),
        sub: None,
        role: role.map(str::to_string),
        exp: Some(exp),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("sign token")
}

pub(crate) fn session_with_role(user_id: &str, role: Role) -> Session {
    Session {
        user_id: user_id.to_string(),
        role,
        token: format!("token-{user_id}"),
        request_id: format!("req-{user_id}"),
    }
}

pub(crate) fn student_session(user_id: &str) -> Session {
    session_with_role(user_id, Role::Student)
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
