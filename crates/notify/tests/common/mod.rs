//! In-process mock of the OIDC issuer and the platform API.
//!
//! [`MockPlatform::start`] serves all three endpoints on an ephemeral
//! localhost port and records every request it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::task::JoinHandle;

use artifact_notify_core::{env, Config};
use artifact_notify_platform::IdentityTokenSource;

pub const RUNNER_SECRET: &str = "runner-secret";
pub const IDENTITY_TOKEN: &str = "mock-oidc-token";
pub const ACCESS_TOKEN: &str = "mock-cbp-token";

/// Canned response for one endpoint.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

/// How the mock answers each endpoint. Defaults to the happy path.
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub identity: Reply,
    pub exchange: Reply,
    pub delivery: Reply,
    pub delivery_delay: Option<Duration>,
    /// Send the exchange status line at once but hold its body back.
    pub exchange_body_delay: Option<Duration>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            identity: Reply::ok(format!(r#"{{"value": "{IDENTITY_TOKEN}"}}"#)),
            exchange: Reply::ok(format!(r#"{{"accessToken": "{ACCESS_TOKEN}"}}"#)),
            delivery: Reply::ok(""),
            delivery_delay: None,
            exchange_body_delay: None,
        }
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: HashMap<String, String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("recorded body should be JSON")
    }
}

#[derive(Default)]
pub struct Calls {
    pub identity: AtomicUsize,
    pub exchange: AtomicUsize,
    pub delivery: AtomicUsize,
}

pub struct MockState {
    behaviour: Behaviour,
    pub calls: Calls,
    pub identity_requests: Mutex<Vec<Recorded>>,
    pub exchange_requests: Mutex<Vec<Recorded>>,
    pub delivery_requests: Mutex<Vec<Recorded>>,
}

pub struct MockPlatform {
    pub base_url: String,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockPlatform {
    pub async fn start(behaviour: Behaviour) -> Self {
        let state = Arc::new(MockState {
            behaviour,
            calls: Calls::default(),
            identity_requests: Mutex::new(Vec::new()),
            exchange_requests: Mutex::new(Vec::new()),
            delivery_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/oidc", get(identity))
            .route("/token-exchange/external-oidc-id-token", post(exchange))
            .route("/v3/external-events", post(delivery))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock platform");
        let addr = listener.local_addr().expect("mock platform address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock platform server");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn identity_source(&self) -> IdentityTokenSource {
        IdentityTokenSource::new(format!("{}/oidc", self.base_url), RUNNER_SECRET)
    }

    pub fn identity_calls(&self) -> usize {
        self.state.calls.identity.load(Ordering::SeqCst)
    }

    pub fn exchange_calls(&self) -> usize {
        self.state.calls.exchange.load(Ordering::SeqCst)
    }

    pub fn delivery_calls(&self) -> usize {
        self.state.calls.delivery.load(Ordering::SeqCst)
    }

    pub fn last_identity_request(&self) -> Recorded {
        last(&self.state.identity_requests)
    }

    pub fn last_exchange_request(&self) -> Recorded {
        last(&self.state.exchange_requests)
    }

    pub fn last_delivery_request(&self) -> Recorded {
        last(&self.state.delivery_requests)
    }
}

impl Drop for MockPlatform {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn last(requests: &Mutex<Vec<Recorded>>) -> Recorded {
    requests
        .lock()
        .unwrap()
        .last()
        .cloned()
        .expect("endpoint was never called")
}

fn record(headers: &HeaderMap, query: HashMap<String, String>, body: String) -> Recorded {
    let header = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Recorded {
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        query,
        body,
    }
}

async fn identity(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.calls.identity.fetch_add(1, Ordering::SeqCst);
    state
        .identity_requests
        .lock()
        .unwrap()
        .push(record(&headers, query, String::new()));
    let reply = &state.behaviour.identity;
    (reply.status, reply.body.clone())
}

async fn exchange(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.calls.exchange.fetch_add(1, Ordering::SeqCst);
    state
        .exchange_requests
        .lock()
        .unwrap()
        .push(record(&headers, HashMap::new(), body));
    let Reply { status, body } = state.behaviour.exchange.clone();
    match state.behaviour.exchange_body_delay {
        Some(delay) => {
            let stalled = futures::stream::once(async move {
                tokio::time::sleep(delay).await;
                Ok::<_, std::io::Error>(body)
            });
            (status, Body::from_stream(stalled)).into_response()
        }
        None => (status, body).into_response(),
    }
}

async fn delivery(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.calls.delivery.fetch_add(1, Ordering::SeqCst);
    state
        .delivery_requests
        .lock()
        .unwrap()
        .push(record(&headers, HashMap::new(), body));
    if let Some(delay) = state.behaviour.delivery_delay {
        tokio::time::sleep(delay).await;
    }
    let reply = &state.behaviour.delivery;
    (reply.status, reply.body.clone())
}

// ---------------------------------------------------------------------------
// Configuration helpers
// ---------------------------------------------------------------------------

/// Every required variable, pointing the platform at `base_url`.
pub fn test_env(base_url: &str) -> HashMap<&'static str, String> {
    [
        (env::GITHUB_RUN_ID, "123456789"),
        (env::GITHUB_RUN_ATTEMPT, "1"),
        (env::CLOUDBEES_API_URL, base_url),
        (env::ARTIFACT_NAME, "testartifact"),
        (env::ARTIFACT_URL, "https://test.com"),
        (env::ARTIFACT_VERSION, "1.0.0"),
        (env::GITHUB_RUN_NUMBER, "123"),
        (env::GITHUB_REPOSITORY, "acme/widgets"),
        (
            env::GITHUB_WORKFLOW_REF,
            "acme/widgets/.github/workflows/ci.yml@refs/heads/main",
        ),
        (env::GITHUB_JOB_NAME, "testjob"),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect()
}

pub fn config_from(vars: &HashMap<&'static str, String>) -> Config {
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test environment is complete")
}

pub fn test_config(base_url: &str) -> Config {
    config_from(&test_env(base_url))
}
