#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use qr_feedback_api::app::app;
use qr_feedback_api::auth::password::hash_password;
use qr_feedback_api::auth::{Claims, TokenService};
use qr_feedback_api::config::AppConfig;
use qr_feedback_api::database::{Advisor, NewAdvisor};
use qr_feedback_api::network::LocalAddress;
use qr_feedback_api::state::AppState;
use qr_feedback_api::store::{AdvisorStore, MemoryStore};
use qr_feedback_api::types::Role;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

// ---------------------------------------------------------------------------
// Spawned binary
// ---------------------------------------------------------------------------

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Memory store, development secret override, no startup QR pass
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_qr-feedback-api"));
        cmd.env("FEEDBACK_API_PORT", port.to_string())
            .env("SERVER_HOST", "127.0.0.1")
            .env("APP_ENV", "development")
            .env("DATABASE_URL", "")
            .env("JWT_SECRET", TEST_SECRET)
            .env("QR_REFRESH_ON_STARTUP", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

// ---------------------------------------------------------------------------
// In-process router over a memory store
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
    pub router: Router,
}

pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.jwt_secret = TEST_SECRET.to_string();
        config.api.enable_request_logging = false;
        config.qr.public_base_url = "http://feedback.test".to_string();

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            config,
            store.clone(),
            LocalAddress::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
        )
        .expect("state");

        Self {
            store,
            tokens: TokenService::new(TEST_SECRET, 1).expect("token service"),
            router: app(state),
        }
    }

    pub async fn seed(&self, email: &str, role: Role) -> Advisor {
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.store
            .create_advisor(NewAdvisor {
                name,
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).expect("hash"),
                role,
            })
            .await
            .expect("seed advisor")
    }

    /// Token whose role claim may disagree with the stored role
    pub fn token_for(&self, id: Uuid, role: Role) -> String {
        self.tokens.issue(id, role).expect("issue token")
    }

    pub fn expired_token_for(&self, id: Uuid, role: Role) -> String {
        let mut claims = Claims::new(id, role, 1);
        claims.iat -= 7200;
        claims.exp -= 7200;
        self.tokens.sign(&claims).expect("sign token")
    }

    pub async fn advisor(&self, id: Uuid) -> Advisor {
        self.store.find_advisor(id).await.expect("store").expect("advisor exists")
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Response { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).expect("request")).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .expect("request");
        self.send(request).await
    }
}
