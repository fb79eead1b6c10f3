//! Bloglist Server Library
//!
//! REST service for a shared blog list: accounts, token auth, blog CRUD and
//! list statistics. See [`router::router`] for the HTTP surface.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod handlers;
pub mod router;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{AuthManager, TokenAuthority};
use config::{AppState, ServerConfig};
use store::BlogStore;

pub use error::{Error, Result};
pub use router::router;

/// Connect the store and wire up shared state for `config`.
pub async fn build_state(config: ServerConfig) -> anyhow::Result<AppState> {
    let pool = store::connect(&config.database_url).await?;

    let tokens = TokenAuthority::new(&config.secret, config.token_ttl);
    let auth = Arc::new(AuthManager::new(pool.clone(), tokens, config.bcrypt_cost));
    info!("Auth Manager initialized");

    let store = Arc::new(BlogStore::new(pool));
    info!("Blog store initialized");

    Ok(AppState {
        config: Arc::new(config),
        store,
        auth,
    })
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    info!("=== Bloglist Server ===");

    let config = ServerConfig::from_env()?;
    info!(
        "Ownership policy: {:?}, token ttl: {}s",
        config.ownership,
        config.token_ttl.as_secs()
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(build_state(config).await?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Bloglist server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
