//! Per-test fixture: an isolated in-memory store behind the full router.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bloglist_core::{BlogRecord, SignupRequest};
use bloglist_server::config::{AppState, OwnershipPolicy, ServerConfig};
use bloglist_server::{build_state, router};
use bloglist_core::validation::ValidBlog;
use serde_json::Value;
use tower::ServiceExt;

pub const ROOT_USERNAME: &str = "root";
pub const ROOT_PASSWORD: &str = "sekret";

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub root_id: String,
}

pub fn initial_blogs() -> Vec<ValidBlog> {
    vec![
        ValidBlog {
            title: "Karina's blog".to_string(),
            author: Some("Karina".to_string()),
            url: "Karina.com".to_string(),
            likes: 10,
        },
        ValidBlog {
            title: "Hector's blog".to_string(),
            author: Some("Hector".to_string()),
            url: "Hector.com".to_string(),
            likes: 24,
        },
    ]
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(OwnershipPolicy::Owner).await
    }

    /// Fresh database seeded with the `root` user and the initial blogs.
    pub async fn spawn_with(ownership: OwnershipPolicy) -> Self {
        let config = ServerConfig::with_secret("integration-test-secret")
            .with_database_url("sqlite::memory:")
            .with_ownership(ownership)
            .with_bcrypt_cost(4);
        let state = build_state(config).await.expect("state");

        let root = state
            .auth
            .register(&signup(ROOT_USERNAME, ROOT_USERNAME, ROOT_PASSWORD))
            .await
            .expect("seed root user");

        for blog in initial_blogs() {
            state.store.create(blog, &root.id).await.expect("seed blog");
        }

        Self {
            router: router(state.clone()),
            state,
            root_id: root.id,
        }
    }

    pub async fn blogs_in_db(&self) -> Vec<BlogRecord> {
        self.state.store.list().await.expect("list blogs")
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
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn login_root(&self) -> String {
        self.login(ROOT_USERNAME, ROOT_PASSWORD).await
    }
}

pub fn signup(username: &str, name: &str, password: &str) -> SignupRequest {
    SignupRequest {
        username: Some(username.to_string()),
        name: Some(name.to_string()),
        password: Some(password.to_string()),
    }
}

pub fn is_json(response: &TestResponse) -> bool {
    response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/json"))
}
