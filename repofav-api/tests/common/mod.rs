#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory store and a scriptable GitHub
/// fake, so the suites run without PostgreSQL or network access.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use repofav_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig},
};
use repofav_shared::{
    auth::password::PasswordPolicy,
    github::{
        GithubApi, GithubError, GithubOAuthConfig, Language, PageInfo, Repository,
        RepositoryPage, Viewer,
    },
    store::{memory::MemoryStore, Stores},
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

pub const APP_URL: &str = "http://localhost:8080";

/// Scriptable GitHub stand-in
pub struct FakeGithub {
    pub login: Mutex<String>,
    pub fail_exchange: AtomicBool,
    pub fail_viewer: AtomicBool,
    pub fail_repositories: AtomicBool,
}

impl FakeGithub {
    pub fn new() -> Self {
        Self {
            login: Mutex::new("octocat".to_string()),
            fail_exchange: AtomicBool::new(false),
            fail_viewer: AtomicBool::new(false),
            fail_repositories: AtomicBool::new(false),
        }
    }

    pub fn set_login(&self, login: &str) {
        *self.login.lock().unwrap() = login.to_string();
    }
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn exchange_code(
        &self,
        _config: &GithubOAuthConfig,
        code: &str,
    ) -> Result<String, GithubError> {
        if self.fail_exchange.load(Ordering::SeqCst) {
            return Err(GithubError::TokenExchange("bad_verification_code".to_string()));
        }
        Ok(format!("gho_{}", code))
    }

    async fn fetch_viewer(&self, _access_token: &str) -> Result<Viewer, GithubError> {
        if self.fail_viewer.load(Ordering::SeqCst) {
            return Err(GithubError::Http {
                status: 401,
                body: "Bad credentials".to_string(),
            });
        }
        Ok(Viewer {
            id: "MDQ6VXNlcjE=".to_string(),
            login: self.login.lock().unwrap().clone(),
        })
    }

    async fn fetch_repositories(
        &self,
        _access_token: &str,
        _first: u32,
        _after: Option<String>,
    ) -> Result<RepositoryPage, GithubError> {
        if self.fail_repositories.load(Ordering::SeqCst) {
            return Err(GithubError::GraphQl("Bad credentials".to_string()));
        }

        Ok(RepositoryPage {
            repos: vec![Repository {
                id: "R_kgDOA".to_string(),
                name: "hello-world".to_string(),
                name_with_owner: "octocat/hello-world".to_string(),
                url: "https://github.com/octocat/hello-world".to_string(),
                is_private: false,
                updated_at: "2024-05-01T12:00:00Z".parse().unwrap(),
                description: Some("My first repository".to_string()),
                stargazer_count: 42,
                fork_count: 7,
                primary_language: Some(Language {
                    name: "Rust".to_string(),
                }),
            }],
            page_info: PageInfo {
                has_next_page: false,
                end_cursor: None,
            },
        })
    }
}

/// A parsed response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` of the first `Set-Cookie`, ready for a `Cookie` header
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .map(|pair| pair.trim().to_string())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Server configuration used by every test context
pub fn test_config(github: Option<GithubOAuthConfig>) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            app_url: APP_URL.to_string(),
            production: false,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        github,
        github_timeout_secs: 10,
        // Cheap parameters keep the suite fast
        password: PasswordPolicy {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

/// Test context containing the router and its backing fakes
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub github: Arc<FakeGithub>,
}

impl TestContext {
    /// Context with GitHub OAuth configured
    pub fn new() -> Self {
        Self::with_github(Some(GithubOAuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            callback_url: "http://localhost:3001/github/oauth/callback".to_string(),
        }))
    }

    pub fn with_github(github: Option<GithubOAuthConfig>) -> Self {
        let config = test_config(github);

        let store = Arc::new(MemoryStore::new());
        let fake = Arc::new(FakeGithub::new());
        let state = AppState::new(config, Stores::from_memory(store.clone()), fake.clone());

        Self {
            app: build_router(state).expect("router builds"),
            store,
            github: fake,
        }
    }

    /// Sends one request through a clone of the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Signs up and logs in, returning the `sid=...` cookie
    pub async fn login_as(&self, email: &str) -> String {
        let password = "correct horse battery";

        let signup = self
            .request(
                Method::POST,
                "/auth/signup",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(signup.status, StatusCode::CREATED);

        let login = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK);

        login.session_cookie().expect("login sets a cookie")
    }
}
