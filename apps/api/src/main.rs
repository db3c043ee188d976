mod admins;
mod ai_client;
mod auth;
mod config;
mod db;
mod errors;
mod locks;
mod models;
mod roadmap;
mod routes;
mod state;
mod store;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::ChatClient;
use crate::auth::HttpAuthProvider;
use crate::config::Config;
use crate::db::create_pool;
use crate::locks::UserLocks;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgDocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Journey API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL-backed document store
    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgDocumentStore::new(pool));

    // Initialize auth provider client
    let auth = Arc::new(HttpAuthProvider::new(config.auth_base_url.clone()));
    info!("Auth provider client initialized");

    // Initialize AI client
    let ai = ChatClient::new(config.openai_api_key.clone())?;
    info!("AI client initialized (model: {})", ai_client::MODEL);

    // Build app state
    let state = AppState {
        store,
        auth,
        ai,
        config: config.clone(),
        roadmap_locks: Arc::new(UserLocks::new()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
