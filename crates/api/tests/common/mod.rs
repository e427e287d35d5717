//! Shared harness for HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use ingetech_api::auth::jwt::JwtConfig;
use ingetech_api::auth::password::hash_password;
use ingetech_api::config::ServerConfig;
use ingetech_api::router::build_app_router;
use ingetech_api::state::AppState;
use ingetech_core::roles::{USER_TYPE_ADMIN, USER_TYPE_CLIENT};
use ingetech_core::types::DbId;
use ingetech_db::models::user::{CreateUser, Recipient, User};
use ingetech_db::repositories::UserRepo;
use ingetech_dispatch::{
    ChannelError, CommunicationDispatcher, Delivery, NotificationChannel, OutboundMessage,
};
use sqlx::PgPool;
use tower::ServiceExt;

pub const SAN_JOSE: DbId = 1;
pub const ALAJUELA: DbId = 2;

/// Password of every user created with [`create_user`].
pub const PASSWORD: &str = "secreto123";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cookie_secure: false,
        public_base_url: "http://localhost:3000".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_expiry_hours: 12,
            remember_me_days: 30,
        },
    }
}

/// Build the full application router with no notification channels and no
/// SMTP sender.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_channels(pool, Vec::new())
}

/// Build the full application router, dispatching through `channels`.
pub fn build_test_app_with_channels(
    pool: PgPool,
    channels: Vec<Arc<dyn NotificationChannel>>,
) -> Router {
    let config = test_config();
    let dispatcher = Arc::new(CommunicationDispatcher::new(pool.clone(), channels));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        dispatcher,
        mailer: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// In-memory channel that records the recipient id of every send.
pub struct RecordingChannel {
    sent: Mutex<Vec<DbId>>,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn recipients(&self) -> Vec<DbId> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(
        &self,
        recipient: &Recipient,
        _message: &OutboundMessage,
    ) -> Result<Delivery, ChannelError> {
        self.sent.lock().unwrap().push(recipient.id);
        Ok(Delivery::Sent)
    }
}

/// Wrap a recording channel as the dispatcher's channel list.
pub fn channels(channel: &Arc<RecordingChannel>) -> Vec<Arc<dyn NotificationChannel>> {
    vec![channel.clone() as Arc<dyn NotificationChannel>]
}

/// Create a user whose password is [`PASSWORD`].
pub async fn create_user(pool: &PgPool, tag: &str, province_id: DbId, user_type_id: DbId) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            identification: format!("ID-{tag}"),
            username: tag.to_string(),
            email: format!("{tag}@example.com"),
            password_hash: hash_password(PASSWORD).unwrap(),
            full_name: format!("Usuario {tag}"),
            phone: Some("8888-8888".to_string()),
            address: None,
            birth_date: None,
            province_id,
            user_type_id,
        },
    )
    .await
    .unwrap()
}

pub async fn create_admin(pool: &PgPool, tag: &str) -> User {
    create_user(pool, tag, SAN_JOSE, USER_TYPE_ADMIN).await
}

pub async fn create_client(pool: &PgPool, tag: &str, province_id: DbId) -> User {
    create_user(pool, tag, province_id, USER_TYPE_CLIENT).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Read the response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::POST, uri, Some(cookie), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(cookie), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::DELETE, uri, Some(cookie), None).await
}

/// Sign in through the API and return the `name=value` pair of the session
/// cookie, ready for a `Cookie` header.
pub async fn login(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie_pair(&response).expect("login must set the session cookie")
}

/// Extract `name=value` of the session cookie from a response.
pub fn session_cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
