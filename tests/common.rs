#![allow(dead_code)]

use event_registry::{
    api::router::create_router,
    config::{Config, SeedAccounts},
    domain::models::account::{Account, AccountRole, NewAccount},
    infra::factory::{run_sqlite_migrations, sqlite_state},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, NaiveDateTime, Utc};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const CLIENT_ID: &str = "myApp";
pub const CLIENT_SECRET: &str = "pass";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        port: 0,
        jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
        jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
        auth_issuer: "test-issuer".to_string(),
        oauth_client_id: CLIENT_ID.to_string(),
        oauth_client_secret: CLIENT_SECRET.to_string(),
        access_token_validity_secs: 600,
        refresh_token_validity_secs: 3600,
        seed_accounts: SeedAccounts {
            admin_username: "admin@email.com".to_string(),
            admin_password: "admin".to_string(),
            user_username: "user@email.com".to_string(),
            user_password: "user".to_string(),
        },
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Same as `new`, with the test config adjusted before the state is built.
    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut config = test_config(&db_url);
        adjust(&mut config);

        let state = Arc::new(sqlite_state(&config, pool.clone()).expect("Failed to build state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, headers, body }
    }

    pub async fn create_account(&self, email: &str, password: &str) -> Account {
        self.state.account_service
            .save_account(NewAccount::new(email, password, [AccountRole::Admin, AccountRole::User]))
            .await
            .expect("Failed to save account")
    }

    pub async fn request_token(&self, form: &str) -> TestResponse {
        self.send(token_request(form)).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> TestResponse {
        self.request_token(&format!("grant_type=refresh_token&refresh_token={}", refresh_token)).await
    }

    pub async fn obtain_token(&self, email: &str, password: &str) -> String {
        let response = self.request_token(&format!("grant_type=password&username={}&password={}", email, password)).await;
        if response.status != StatusCode::OK {
            panic!("Token request failed in test helper: status {} body {}", response.status, response.body);
        }
        response.body["access_token"].as_str().expect("No access_token in body").to_string()
    }

    /// Creates a fresh account and returns it with a bearer token.
    pub async fn authenticated(&self) -> (Account, String) {
        let email = format!("{}@email.com", Uuid::new_v4());
        let account = self.create_account(&email, "1234").await;
        let token = self.obtain_token(&email, "1234").await;
        (account, token)
    }

    pub async fn post_event(&self, token: Option<&str>, payload: &Value) -> TestResponse {
        self.send(json_request("POST", "/api/events", token, payload)).await
    }

    pub async fn put_event(&self, token: Option<&str>, id: i64, payload: &Value) -> TestResponse {
        self.send(json_request("PUT", &format!("/api/events/{}", id), token, payload)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Creates an event through the API and returns its id.
    pub async fn generate_event(&self, token: &str, index: usize) -> i64 {
        let mut payload = event_payload();
        payload["name"] = json!(format!("event {}", index));
        let response = self.post_event(Some(token), &payload).await;
        assert_eq!(response.status, StatusCode::CREATED, "body: {}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", general_purpose::STANDARD.encode(format!("{}:{}", client_id, client_secret)))
}

/// Token endpoint request authenticated as the configured client.
pub fn token_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/oauth/token")
        .header(header::AUTHORIZATION, basic_auth(CLIENT_ID, CLIENT_SECRET))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, payload: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/hal+json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn fmt(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// A valid paid, offline event.
pub fn event_payload() -> Value {
    let now = Utc::now().naive_utc();
    json!({
        "name": "Spring",
        "description": "REST API Development with Spring",
        "beginEnrollmentDateTime": fmt(now),
        "closeEnrollmentDateTime": fmt(now + Duration::days(1)),
        "beginEventDateTime": fmt(now + Duration::days(2)),
        "endEventDateTime": fmt(now + Duration::days(3)),
        "location": "Gangnam Station D2 startup factory",
        "basePrice": 100,
        "maxPrice": 200,
        "limitOfEnrollment": 100
    })
}
