//! Test harness: a scripted stand-in for the hosted data service and a running API server.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    Router,
};
use regtime::config::{Config, DatabaseConfig, FormConfig, ServerConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const FORM_ID: &str = "3f9a2c1e-8b7d-4e6f-a5c4-1b2d3e4f5a6b";
pub const PROJECT_ID: &str = "6f1c8a5e-2c1d-4c59-8f7e-0d6b1f0b9a11";
pub const GUEST_ID: &str = "00000000-0000-0000-0000-000000000000";

/// A request as the fake service saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    /// Decoded query-string pairs
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://fake{}", self.path_and_query))
            .expect("recorded uri is a valid path");
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// Canned answer
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub content_range: Option<String>,
}

impl Reply {
    pub fn json(status: u16, value: Value) -> Self {
        Self {
            status,
            body: value.to_string(),
            content_range: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_range: None,
        }
    }

    pub fn no_content() -> Self {
        Self::text(204, "")
    }

    pub fn count(total: u64) -> Self {
        Self {
            status: 200,
            body: String::new(),
            content_range: Some(format!("0-0/{}", total)),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    method: Method,
    path: String,
    query_contains: Option<String>,
    reply: Reply,
}

#[derive(Clone, Default)]
struct FakeState {
    rules: Arc<Mutex<Vec<Rule>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Scripted data service on an ephemeral port
pub struct FakeService {
    pub base_url: String,
    state: FakeState,
}

impl FakeService {
    pub async fn start() -> Self {
        let state = FakeState::default();
        let app = Router::new().fallback(answer).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake service");
        let addr = listener.local_addr().expect("fake service address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake service");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `method path` with `reply`; earlier rules win
    pub fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.push_rule(method, path, None, reply);
    }

    /// Like `reply`, but only when the raw query string contains `fragment`
    pub fn reply_when(&self, method: Method, path: &str, fragment: &str, reply: Reply) {
        self.push_rule(method, path, Some(fragment.to_string()), reply);
    }

    fn push_rule(&self, method: Method, path: &str, query_contains: Option<String>, reply: Reply) {
        self.state.rules.lock().unwrap().push(Rule {
            method,
            path: path.to_string(),
            query_contains,
            reply,
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.base_url.clone(),
            anon_key: "anon-key".to_string(),
        }
    }
}

async fn answer(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let query = uri.query().unwrap_or_default().to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        path_and_query,
        headers,
        body,
    });

    let reply = state
        .rules
        .lock()
        .unwrap()
        .iter()
        .find(|rule| {
            rule.method == method
                && rule.path == path
                && rule
                    .query_contains
                    .as_ref()
                    .map_or(true, |fragment| query.contains(fragment.as_str()))
        })
        .map(|rule| rule.reply.clone())
        .unwrap_or_else(|| Reply::json(404, json!({ "message": "no scripted reply" })));

    let mut builder = Response::builder().status(reply.status);
    if let Some(range) = &reply.content_range {
        builder = builder.header("content-range", range.as_str());
    }
    if !reply.body.is_empty() {
        builder = builder.header("content-type", "application/json");
    }
    builder.body(Body::from(reply.body)).expect("fake response")
}

pub fn valid_form() -> FormConfig {
    FormConfig {
        portal_id: "4455667".to_string(),
        form_id: FORM_ID.to_string(),
        region: "na1".to_string(),
    }
}

/// A full project row as the service would return it
pub fn project_row(name: &str) -> Value {
    json!({
        "id": PROJECT_ID,
        "user_id": GUEST_ID,
        "name": name,
        "description": "Gut rehab of 12 units",
        "status": "active",
        "budget": 250000.0,
        "project_type": "rehab",
        "created_at": "2024-03-01T12:00:00+00:00",
        "updated_at": "2024-03-02T08:30:00+00:00"
    })
}

/// The API server running against `fake`, returning its base URL
pub async fn start_api(fake: &FakeService, form: FormConfig) -> String {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: fake.database_config(),
        form,
    };
    let state = regtime::server::create_state(&config).expect("app state");
    let app = regtime::server::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind api");
    let addr = listener.local_addr().expect("api address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("api server");
    });

    format!("http://{}", addr)
}
