use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use crate::{
    config::{Config, DatabaseConfig, StoreBackend},
    domain::events::AppEvent,
    repository::{memory::MemoryStore, Store},
    routes::{
        event::stream,
        health,
        referral::{get_referral, post_referral},
        user::{get_user, post_user},
    },
};
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    store: Store,
    tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(store: Store, tx: broadcast::Sender<AppEvent>) -> Self {
        Self { store, tx }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn get_sender(&self) -> broadcast::Sender<AppEvent> {
        self.tx.clone()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();
    Router::new()
        .route("/stream", get(stream))
        .route("/api/referral", get(get_referral).post(post_referral))
        .route("/api/user", get(get_user).post(post_user))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
}

pub struct Application;

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<()> {
        Self::setup_tracing(&config.application.debug_mode);

        let store = match config.application.store_backend {
            StoreBackend::Postgres => Self::get_store(&config.database).await,
            StoreBackend::Memory => Store::Memory(Arc::new(MemoryStore::default())),
        };
        let (tx, _rx) = broadcast::channel(100);
        let app_state = Arc::new(AppState::new(store, tx));

        let app = router(app_state);

        let ip = config.application.host.parse::<IpAddr>()?;
        let addr = SocketAddr::new(ip, config.application.port);
        tracing::info!("listening on {}", addr.port());
        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }

    fn setup_tracing(debug_mode: &str) {
        let _ = tracing_log::LogTracer::init();
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| debug_mode.into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    async fn get_store(db_config: &DatabaseConfig) -> Store {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy_with(db_config.get_connect_options());
        Store::Postgres(pool)
    }
}
