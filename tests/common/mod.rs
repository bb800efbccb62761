//! Shared harness for router-level tests
#![allow(dead_code)]

use std::sync::Arc;

use account_service::config::AppConfig;
use account_service::domain::{RepositoryProvider, UserRole};
use account_service::infrastructure::database::connect_in_memory;
use account_service::interfaces::http::{create_api_router, LoginThrottle, LoginThrottleConfig};
use account_service::SeaOrmRepositoryProvider;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub router: Router,
    pub repos: Arc<dyn RepositoryProvider>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn set_cookie(&self) -> &str {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.security.jwt_secret = "integration-test-secret".to_string();
    cfg
}

pub async fn spawn_app() -> TestApp {
    let cfg = test_config();
    let throttle = LoginThrottleConfig::from(&cfg.rate_limit);
    spawn_app_with(cfg, throttle).await
}

pub async fn spawn_app_with(cfg: AppConfig, throttle: LoginThrottleConfig) -> TestApp {
    let db = connect_in_memory().await.unwrap();
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let handle = PrometheusBuilder::new().build_recorder().handle();

    let router = create_api_router(
        repos.clone(),
        db,
        &cfg,
        handle,
        LoginThrottle::shared(throttle),
    );

    TestApp { router, repos }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
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

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn register(&self, username: &str, email: &str) -> TestResponse {
        self.call(
            Method::POST,
            "/auth/register",
            Some(json!({
                "username": username,
                "email": email,
                "full_name": format!("{} Example", username),
                "password": PASSWORD,
            })),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.call(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Register and log in, returning `(user_id, token)`
    pub async fn signed_in_user(&self, username: &str) -> (String, String) {
        let email = format!("{}@example.com", username);
        let registered = self.register(username, &email).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);
        let id = registered.data()["id"].as_str().unwrap().to_string();

        let login = self.login(&email, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        let token = login.data()["accessToken"].as_str().unwrap().to_string();
        (id, token)
    }

    /// An admin session; the role is granted directly through the store
    pub async fn admin_token(&self) -> String {
        let email = "root_admin@example.com";
        let registered = self.register("root_admin", email).await;
        let id = registered.data()["id"].as_str().unwrap().to_string();
        self.repos
            .users()
            .set_role(&id, UserRole::Admin)
            .await
            .unwrap()
            .unwrap();

        let login = self.login(email, PASSWORD).await;
        login.data()["accessToken"].as_str().unwrap().to_string()
    }
}
