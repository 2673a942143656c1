use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;


use crate::config::Config;
use crate::db::ProductGateway;
use crate::services::ProductService;

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn ProductGateway>,
    pub products: ProductService,
}

impl AppState {
    pub fn new(db: Arc<dyn ProductGateway>) -> Self {
        Self {
            products: ProductService::new(db.clone()),
            db,
        }
    }
}

/// `RUST_LOG` wins; otherwise `LOG_LEVEL` (e.g. `DEBUG`), otherwise `info`.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            EnvFilter::try_new(level.to_lowercase())
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set; using the development default.");
    }

    let gateway = db::connect(&config).await?;
    let app = build_router(AppState::new(gateway));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route("/product", post(handlers::products::create_product))
        .route(
            "/product/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    Router::new()
        // ── Probes ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))

        // ── Products CRUD ───────────────────────────────────────────────────
        .nest("/api", api)

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
