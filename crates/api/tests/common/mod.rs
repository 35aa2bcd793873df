//! Shared test harness: router construction mirroring `main.rs`, a stub
//! form provider, and HTTP helpers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use gradlink_api::auth::jwt::{generate_access_token, JwtConfig};
use gradlink_api::config::{ServerConfig, TallyConfig};
use gradlink_api::routes;
use gradlink_api::state::AppState;
use gradlink_api::tally::client::{FormProvider, ProviderError};

/// Platform JWT secret used by all tests.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-long-enough-for-hmac";

/// Session token secret used by all tests.
pub const TEST_SESSION_SECRET: &str = "test-session-token-secret-for-forms";

/// Stub [`FormProvider`] that fabricates ids and records what it was asked
/// to create, so tests can assert on the injected hidden field.
#[derive(Default)]
pub struct StubProvider {
    pub created_forms: Mutex<Vec<Vec<Value>>>,
    pub created_webhooks: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl FormProvider for StubProvider {
    async fn create_form(&self, blocks: Vec<Value>) -> Result<String, ProviderError> {
        let mut forms = self.created_forms.lock().unwrap();
        forms.push(blocks);
        Ok(format!("stub-form-{}", forms.len()))
    }

    async fn create_webhook(
        &self,
        form_id: &str,
        callback_url: &str,
        signing_secret: &str,
    ) -> Result<String, ProviderError> {
        let mut hooks = self.created_webhooks.lock().unwrap();
        hooks.push((
            form_id.to_string(),
            callback_url.to_string(),
            signing_secret.to_string(),
        ));
        Ok(format!("stub-webhook-{}", hooks.len()))
    }

    async fn delete_webhook(&self, _webhook_id: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Build a test `ServerConfig` with known secrets and safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        tally: TallyConfig {
            session_token_secret: TEST_SESSION_SECRET.to_string(),
            api_key: "test-api-key".to_string(),
            api_base: "https://api.tally.example".to_string(),
            embed_base: "https://tally.example".to_string(),
            callback_base: "https://gradlink.example".to_string(),
            nonce_ttl_hours: 24,
        },
    }
}

/// Mint a platform access token for the given user and role.
pub fn access_token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Build the full application router with all middleware layers, using the
/// given database pool and form provider.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with_provider(
    pool: PgPool,
    provider: Arc<dyn FormProvider>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        provider,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Build the test app with a throwaway stub provider.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_provider(pool, Arc::new(StubProvider::default()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: Value,
    token: &str,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    body: Value,
    token: &str,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a raw webhook body with an optional `tally-signature` header.
pub async fn post_webhook(
    app: Router,
    path: &str,
    body: String,
    signature: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json");
    if let Some(sig) = signature {
        builder = builder.header("tally-signature", sig);
    }
    app.oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
