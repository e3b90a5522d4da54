#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

use rusty_shortener::application::services::{
    AccessGate, ApiKeyEntry, IssuanceService, IssuanceSettings, ResolutionService,
};
use rusty_shortener::domain::repositories::UrlRepository;
use rusty_shortener::infrastructure::cache::NullCache;
use rusty_shortener::infrastructure::persistence::MemoryUrlRepository;
use rusty_shortener::routes::api_router;
use rusty_shortener::state::AppState;
use rusty_shortener::utils::alias_validator::AliasValidator;
use rusty_shortener::utils::code_generator::CodeGenerator;

pub const TEST_KEY: &str = "test-key";
pub const BASE_URL: &str = "http://sho.rt/dns_resolver";

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
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
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_issuance_service(repository: Arc<dyn UrlRepository>) -> IssuanceService {
    let gate = AccessGate::new(&[
        ApiKeyEntry::parse(&format!("frontend:{}", TEST_KEY)).unwrap(),
        ApiKeyEntry::parse("ops:ops-key").unwrap(),
    ]);

    IssuanceService::new(
        repository,
        Arc::new(gate),
        CodeGenerator::default(),
        AliasValidator::new(32, &["login".to_string()]),
        IssuanceSettings {
            base_url: BASE_URL.to_string(),
            max_generation_attempts: 5,
            store_max_retries: 2,
            store_retry_base_delay: Duration::from_millis(1),
        },
    )
}

pub fn create_test_state_with(repository: Arc<dyn UrlRepository>) -> AppState {
    let cache = Arc::new(NullCache::new());

    AppState::new(
        Arc::new(create_issuance_service(repository.clone())),
        Arc::new(ResolutionService::new(repository.clone(), cache.clone())),
        repository,
        cache,
    )
}

pub fn create_test_state() -> (AppState, MemoryUrlRepository) {
    let repository = MemoryUrlRepository::new();
    let state = create_test_state_with(Arc::new(repository.clone()));
    (state, repository)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(api_router(state).layer(MockConnectInfoLayer)).unwrap()
}
