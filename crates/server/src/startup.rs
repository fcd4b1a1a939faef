use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};
use service::{
    auth::{AdminAuthConfig, AdminAuthService},
    catalog::{CatalogService, JsonFileCatalogStore},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Open the catalog document and set up admin auth from configuration
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    if cfg.auth.jwt_secret.is_none() {
        warn!("JWT_SECRET not set; using development secret");
    }
    if cfg.auth.uses_default_password() {
        warn!(username = %cfg.auth.admin_username, "admin password not configured; using default");
    }

    let store = JsonFileCatalogStore::open(&cfg.storage.products_file).await?;
    info!(path = %store.path().display(), "catalog store opened");

    let session_ttl = chrono::Duration::try_hours(cfg.auth.session_ttl_hours).ok_or_else(|| {
        StartupError::InvalidConfig(format!("session ttl of {} hours is out of range", cfg.auth.session_ttl_hours))
    })?;
    let auth = AdminAuthService::new(AdminAuthConfig {
        username: cfg.auth.admin_username.clone(),
        password_hash: cfg.auth.admin_password_hash.clone(),
        password: cfg.auth.admin_password.clone(),
        jwt_secret: cfg.auth.jwt_secret_or_default().to_string(),
        session_ttl,
    })
    .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    Ok(ServerState {
        catalog: Arc::new(CatalogService::new(Arc::new(store))),
        auth: Arc::new(auth),
        cookie_name: cfg.auth.cookie_name.clone(),
    })
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve until Ctrl+C. Logging and config loading are the caller's job.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.storage.products_file).await?;
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
