// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mock Opsgenie + Slack API for integration tests.
//!
//! One axum server answers both APIs on `127.0.0.1:0` and records every
//! request it sees. Slack group membership is kept in memory so repeated
//! updates can be observed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Once};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// A fixed status + body.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body: body.to_string() }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self { status, body: body.to_owned() }
    }
}

/// Responses served by the mock. `update` of `None` applies the update to the
/// in-memory membership and reports the real resulting count.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub on_call: Canned,
    pub lookup: Canned,
    pub groups: Canned,
    pub update: Option<Canned>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            on_call: on_call(&["alice@example.com"]),
            lookup: Canned::json(200, json!({"ok": true, "user": {"id": "U123", "name": "alice"}})),
            groups: Canned::json(
                200,
                json!({
                    "ok": true,
                    "usergroups": [
                        {"id": "G111", "name": "backend", "handle": "backend"},
                        {"id": "G987", "name": "oncall-pager", "handle": "oncall"},
                    ]
                }),
            ),
            update: None,
        }
    }
}

/// Opsgenie on-call body listing `recipients`.
pub fn on_call(recipients: &[&str]) -> Canned {
    Canned::json(
        200,
        json!({
            "data": {
                "_parent": {"id": "d875e654", "name": "ops_schedule", "enabled": true},
                "onCallRecipients": recipients,
            },
            "took": 0.104,
            "requestId": "c7a2cf5a-2a04-4e5f-8d5d-d2e4e1e5f7d6",
        }),
    )
}

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Shared {
    config: Mutex<Option<MockConfig>>,
    requests: Mutex<Vec<Recorded>>,
    members: Mutex<HashMap<String, Vec<String>>>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    shared: Arc<Shared>,
}

impl MockApi {
    pub async fn spawn(config: MockConfig) -> anyhow::Result<Self> {
        ensure_crypto();
        let shared = Arc::new(Shared::default());
        *shared.config.lock() = Some(config);

        let app = Router::new().fallback(respond).with_state(Arc::clone(&shared));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        Ok(Self { addr, shared })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().clone()
    }

    /// Number of requests whose path ends with `suffix`.
    pub fn count(&self, suffix: &str) -> usize {
        self.shared.requests.lock().iter().filter(|r| r.path.ends_with(suffix)).count()
    }

    /// Number of requests that went to the Slack side of the mock.
    pub fn slack_calls(&self) -> usize {
        self.shared.requests.lock().iter().filter(|r| !r.path.starts_with("/v2/")).count()
    }

    pub fn members(&self, group_id: &str) -> Option<Vec<String>> {
        self.shared.members.lock().get(group_id).cloned()
    }
}

async fn respond(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_owned();
    let parsed_body = serde_json::from_str::<Value>(&body).ok();
    shared.requests.lock().push(Recorded {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: parsed_body.clone(),
    });

    let Some(config) = shared.config.lock().clone() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let canned = if path.ends_with("/on-calls") {
        config.on_call
    } else if path.ends_with("/users.lookupByEmail") {
        config.lookup
    } else if path.ends_with("/usergroups.list") {
        config.groups
    } else if path.ends_with("/usergroups.users.update") {
        match config.update {
            Some(canned) => canned,
            None => apply_update(&shared, parsed_body.unwrap_or(Value::Null)),
        }
    } else {
        Canned::text(404, "not found")
    };

    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response()
}

fn apply_update(shared: &Shared, body: Value) -> Canned {
    let Some(group_id) = body["usergroup"].as_str() else {
        return Canned::json(200, json!({"ok": false, "error": "invalid_arguments"}));
    };
    let users: Vec<String> = body["users"]
        .as_str()
        .unwrap_or_default()
        .split(',')
        .filter(|u| !u.is_empty())
        .map(str::to_owned)
        .collect();
    let count = users.len();
    shared.members.lock().insert(group_id.to_owned(), users.clone());
    Canned::json(
        200,
        json!({
            "ok": true,
            "usergroup": {"id": group_id, "name": "oncall-pager", "user_count": count, "users": users}
        }),
    )
}
