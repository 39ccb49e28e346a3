pub mod api;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod pages;
pub mod services;
pub mod ui;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::Result,
    infrastructure::{cache::Cache, store::UserStore},
    middleware::rate_limit::{RateLimiter, create_limiter},
    services::auth::JwtService,
    ui::{HandlerContext, PageMarkup, UiController},
};

/// Server buttons rendered on the panel page.
pub const PAIR_SERVER_COUNT: u32 = 3;
pub const QR_SERVER_COUNT: u32 = 3;

#[derive(Clone)]
pub struct RateLimiters {
    pub auth: RateLimiter,
    pub ui: RateLimiter,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<Cache>,
    pub users: Arc<UserStore>,
    pub jwt_service: Arc<JwtService>,
    pub page: Arc<PageMarkup>,
    pub ui_controller: Arc<UiController>,
    pub rate_limiters: Arc<RateLimiters>,
}

impl AppState {
    /// Wires every service from `config`. Fails if the panel page cannot be
    /// bound to the UI controller.
    pub async fn initialize(config: Config) -> Result<Self> {
        let cache = Arc::new(Cache::init(&config));
        tracing::info!("Cache initialized");

        let users = if config.accounts.seed_demo_user {
            UserStore::seeded().await
        } else {
            UserStore::new()
        };
        tracing::info!(users = users.count().await, "User store initialized");

        let jwt_service = JwtService::new(&config.jwt);
        tracing::info!("JWT service initialized");

        let page = PageMarkup::godzexmd(PAIR_SERVER_COUNT, QR_SERVER_COUNT);
        let ui_controller = UiController::bind(HandlerContext::from_config(&config), &page)?;
        tracing::info!("UI controller bound");

        let rate_limiters = RateLimiters {
            auth: create_limiter(cache.clone(), config.rate_limit.auth_limit, "auth"),
            ui: create_limiter(cache.clone(), config.rate_limit.ui_limit, "ui"),
        };

        Ok(Self {
            config: Arc::new(config),
            cache,
            users: Arc::new(users),
            jwt_service: Arc::new(jwt_service),
            page: Arc::new(page),
            ui_controller: Arc::new(ui_controller),
            rate_limiters: Arc::new(rate_limiters),
        })
    }

    pub fn secure_cookies(&self) -> bool {
        self.config.server.server_public_url.starts_with("https://")
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .server
                .cors_allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect::<Vec<_>>(),
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .nest("/api", api::router())
        .merge(pages::router())
        .route("/health", get(|| async { "ok" }))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::logging::make_log_span)
                .on_request(())
                .on_eos(()),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(ConcurrencyLimitLayer::new(
            state.config.server.max_concurrent_requests,
        ))
        .with_state(state)
}
