//! HTTP-level tests driving the router with `oneshot`

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;
use tower::ServiceExt;
use warden::{AppId, SqliteRepositoryProvider, Warden, WardenMailer};
use warden_core::repositories::{
    AppRepositoryProvider, RepositoryProvider, VerificationRepository,
    VerificationRepositoryProvider,
};
use warden_mailer::{Email, Mailer, MailerError, TemplateContext};

const APP_SECRET: &str = "api-test-secret";

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        self.sent.lock().await.push(email);
        Ok(())
    }
}

struct TestApp {
    router: Router,
    repositories: Arc<SqliteRepositoryProvider>,
    app_id: AppId,
}

impl TestApp {
    async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("Failed to connect to SQLite");
        let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
        repositories.migrate().await.expect("Migration failed");
        let app_id = repositories.app().insert("web", APP_SECRET).await.unwrap();

        let mailer = WardenMailer::new(
            Box::new(Arc::new(RecordingMailer::default())),
            "noreply@example.com",
            TemplateContext::default(),
        );
        let warden = Arc::new(Warden::new(repositories.clone()).with_mailer(mailer));

        Self {
            router: warden_axum::routes(warden).build(),
            repositories,
            app_id,
        }
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn pending_code(&self, email: &str) -> Option<String> {
        self.repositories
            .verification()
            .find(email)
            .await
            .unwrap()
            .map(|record| record.code)
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.call("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            "POST",
            "/register",
            Some(json!({"email": "a@x.com", "password": "p1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], 1);

    let (status, body) = app
        .call(
            "POST",
            "/login",
            Some(json!({"email": "a@x.com", "password": "p1", "app_id": app.app_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = warden::AuthToken::from(body["token"].as_str().unwrap().to_string());
    assert_eq!(token.claims(APP_SECRET).unwrap().email, "a@x.com");

    let (status, body) = app
        .call(
            "POST",
            "/login",
            Some(json!({"email": "a@x.com", "password": "nope", "app_id": app.app_id})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_missing_fields_are_bad_requests() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call("POST", "/register", Some(json!({"password": "p1"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
    assert_eq!(body["code"], "EMPTY_EMAIL");

    let (status, body) = app
        .call(
            "POST",
            "/login",
            Some(json!({"email": "a@x.com", "password": "p1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "app_id is required");

    let (status, body) = app.call("GET", "/users/abc/admin", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = TestApp::new().await;
    let request = json!({"email": "a@x.com", "password": "p1"});

    app.call("POST", "/register", Some(request.clone())).await;
    let (status, body) = app.call("POST", "/register", Some(request)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USER_EXISTS");
}

#[tokio::test]
async fn test_verification_flow() {
    let app = TestApp::new().await;
    app.call(
        "POST",
        "/register",
        Some(json!({"email": "a@x.com", "password": "p1"})),
    )
    .await;

    let (status, _) = app
        .call("POST", "/verification", Some(json!({"email": "a@x.com"})))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let code = app.pending_code("a@x.com").await.unwrap();

    let (status, body) = app
        .call(
            "POST",
            "/verification/verify",
            Some(json!({"email": "a@x.com", "code": format!("{code}0")})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CODES_DIFFER");

    let (status, body) = app
        .call(
            "POST",
            "/verification/verify",
            Some(json!({"email": "a@x.com", "code": code})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);

    let (status, body) = app
        .call(
            "POST",
            "/verification/verify",
            Some(json!({"email": "a@x.com", "code": code})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "VERIFICATION_NOT_FOUND");
}

#[tokio::test]
async fn test_password_reset() {
    let app = TestApp::new().await;
    app.call(
        "POST",
        "/register",
        Some(json!({"email": "a@x.com", "password": "p1"})),
    )
    .await;
    let code = app.pending_code("a@x.com").await.unwrap();

    let (status, body) = app
        .call(
            "POST",
            "/password/reset",
            Some(json!({"email": "a@x.com", "code": code, "new_password": "p1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PASSWORDS_ARE_EQUAL");

    let (status, _) = app
        .call(
            "POST",
            "/password/reset",
            Some(json!({"email": "a@x.com", "code": code, "new_password": "p2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.pending_code("a@x.com").await.is_none());
}

#[tokio::test]
async fn test_is_admin() {
    let app = TestApp::new().await;
    app.call(
        "POST",
        "/register",
        Some(json!({"email": "a@x.com", "password": "p1"})),
    )
    .await;

    let (status, body) = app.call("GET", "/users/1/admin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], false);

    let (status, body) = app.call("GET", "/users/42/admin", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
}
