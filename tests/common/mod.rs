#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, middleware, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use click_tracker::api::handlers::{click_handler, health_handler};
use click_tracker::api::middleware::auth;
use click_tracker::api::routes::protected_routes;
use click_tracker::application::services::LinkSigner;
use click_tracker::config::{Config, PoolSettings};
use click_tracker::domain::entities::{NewPlacement, Placement};
use click_tracker::infrastructure::persistence::InMemoryPlacementRepository;
use click_tracker::infrastructure::registry::{ClickRegistry, InMemoryClickRegistry};
use click_tracker::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://localhost:3000";
pub const FALLBACK_URL: &str = "https://fallback.example.com/landing";
pub const API_TOKEN: &str = "test-api-token";
pub const PEER_ADDR: &str = "127.0.0.1:12345";

pub const TOKEN_A: &str = "1234567890abcdef1234567890abcdef12345678";
pub const TOKEN_B: &str = "abcdefabcdefabcdefabcdefabcdefabcdefabcd";
pub const BROWSER_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36";

#[derive(Clone)]
pub struct MockConnectInfoLayer(pub SocketAddr);

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.0,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        hmac_secret: TEST_SECRET.to_string(),
        base_url: BASE_URL.to_string(),
        fallback_url: FALLBACK_URL.to_string(),
        api_token: Some(API_TOKEN.to_string()),
        registry_ttl_seconds: None,
        extra_bot_patterns: Vec::new(),
        pool: PoolSettings::default(),
    }
}

/// In-memory application wired the same way the server wires it.
pub struct TestApp {
    pub state: AppState,
    pub placements: Arc<InMemoryPlacementRepository>,
    pub signer: LinkSigner,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_registry(config, Arc::new(InMemoryClickRegistry::new()))
    }

    pub fn with_registry(config: Config, registry: Arc<dyn ClickRegistry>) -> Self {
        let placements = Arc::new(InMemoryPlacementRepository::new());
        let state = AppState::new(&config, placements.clone(), registry);
        let signer = LinkSigner::new(config.hmac_secret.as_bytes(), config.base_url.as_str());

        Self {
            state,
            placements,
            signer,
        }
    }

    /// Public click and health routes as seen from `peer`.
    pub fn public_server(&self, peer: &str) -> TestServer {
        let app = Router::new()
            .route("/c", get(click_handler))
            .route("/health", get(health_handler))
            .layer(MockConnectInfoLayer(peer.parse().unwrap()))
            .with_state(self.state.clone());

        TestServer::new(app).unwrap()
    }

    /// Management API behind bearer authentication.
    pub fn api_server(&self) -> TestServer {
        let api = protected_routes().route_layer(middleware::from_fn_with_state(
            self.state.clone(),
            auth::layer,
        ));

        let app = Router::new()
            .nest("/api", api)
            .layer(MockConnectInfoLayer(PEER_ADDR.parse().unwrap()))
            .with_state(self.state.clone());

        TestServer::new(app).unwrap()
    }

    /// Seeds a placement created `age` ago.
    pub fn seed_placement(&self, id: &str, landing_url: &str, age: Duration) -> Placement {
        self.seed_placement_at(id, landing_url, Utc::now() - age)
    }

    pub fn seed_placement_at(
        &self,
        id: &str,
        landing_url: &str,
        created_at: DateTime<Utc>,
    ) -> Placement {
        self.placements.insert(
            NewPlacement {
                id: id.to_string(),
                advertiser_id: format!("adv-{id}"),
                publisher_id: "pub-1".to_string(),
                send_id: format!("send-{id}"),
                price_cpc_cents: 150,
                landing_url: landing_url.to_string(),
            },
            created_at,
        )
    }

    /// Relative click URL (`/c?...`) for a placement and subscriber token.
    pub fn click_path(&self, placement_id: &str, token: &str) -> String {
        format!(
            "/c?placementId={}&sig={}&_bhlid={}",
            placement_id,
            self.signer.sign(placement_id),
            token
        )
    }

    pub fn counters(&self) -> (u64, u64, u64) {
        let snap = self.state.click_service.counters().snapshot();
        (snap.total, snap.unique, snap.failed)
    }
}

pub fn bearer() -> String {
    format!("Bearer {API_TOKEN}")
}
