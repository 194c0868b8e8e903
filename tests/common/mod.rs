//! Shared harness for the HTTP integration tests.
//!
//! Each `TestApp` owns a fresh in-memory SQLite database with migrations
//! applied, and drives the real router without binding a socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use expense_tracker::api::{create_router, AppState};
use expense_tracker::config::Config;
use expense_tracker::infra::Database;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub database: Arc<Database>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = Config::new("sqlite::memory:", TEST_JWT_SECRET);
        // Every pooled connection to `sqlite::memory:` is its own database
        config.database_max_connections = 1;

        let database = Arc::new(
            Database::connect(&config)
                .await
                .expect("in-memory database should open"),
        );
        let router = create_router(AppState::from_config(database.clone(), config));

        Self { router, database }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/register",
            None,
            Some(json!({ "username": username, "password": PASSWORD })),
        )
        .await
    }

    pub async fn login(&self, username: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": PASSWORD })),
        )
        .await
    }

    /// Register `username` and return a fresh access token.
    pub async fn signup(&self, username: &str) -> String {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self.login(username).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        login.body["access_token"]
            .as_str()
            .expect("access_token")
            .to_string()
    }

    /// Create a category and return its id.
    pub async fn category(&self, token: &str, name: &str) -> i64 {
        let response = self.post("/category", token, json!({ "name": name })).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("category id")
    }

    /// Record an expense and return the created body.
    pub async fn expense(&self, token: &str, body: Value) -> Value {
        let response = self.post("/expense", token, body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}
