#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use group_access::{
    AppState,
    app::router::build_router,
    config::AppConfig,
    subscriptions::{MemorySubscriptionStore, SubscriptionStore},
};
use serde_json::Value;
use tower::ServiceExt;

pub const PREFIX: &str = "/api/subscriptions";

pub struct TestApp {
    app: Router,
    pub store: Arc<MemorySubscriptionStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response is not valid utf-8 text")
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is not valid json")
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(&AppConfig::default())
    }

    pub fn with_config(config: &AppConfig) -> Self {
        let store = Arc::new(MemorySubscriptionStore::new());
        let state = AppState {
            store: store.clone(),
        };

        Self {
            app: build_router(state, config),
            store,
        }
    }

    /// Registers `alice` and `bob` plus three catalogue groups.
    pub async fn seeded() -> Self {
        let app = Self::new();
        for username in ["alice", "bob"] {
            app.store
                .register_subscriber(username)
                .await
                .expect("failed to seed subscriber");
        }
        for (name, description) in [
            ("FIN_DAILY", "Daily finance reports"),
            ("RISK_WEEKLY", "Weekly risk reports"),
            ("OPS_MONTHLY", "Monthly operations reports"),
        ] {
            app.store
                .create_group(name, description)
                .await
                .expect("failed to seed group");
        }
        app
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Submits a request and returns the id the store assigned to it.
    pub async fn pending_request_id(&self, username: &str, group_name: &str) -> i64 {
        let response = self
            .post_json(
                &format!("{PREFIX}/request"),
                serde_json::json!({ "username": username, "groupName": group_name }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());

        self.store
            .pending_requests()
            .await
            .expect("failed to list pending requests")
            .into_iter()
            .find(|r| r.subscriber_username == username && r.group_name == group_name)
            .map(|r| r.id)
            .expect("request was not recorded")
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request execution failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("failed to read response body");

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut req_builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(body) => {
                req_builder = req_builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&body).expect("failed to serialize request body"))
            }
            None => Body::empty(),
        };

        let req = req_builder.body(body).expect("failed to build request");
        self.send(req).await
    }
}
