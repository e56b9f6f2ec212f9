//! # repofav API Server
//!
//! Email/password accounts with cookie sessions, GitHub account linking,
//! repository listing and favorites.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/repofav cargo run -p repofav-api
//! ```

use repofav_api::{
    app::{build_router, AppState},
    config::Config,
};
use repofav_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    github::GithubClient,
    store::Stores,
};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "repofav API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    if config.github.is_none() {
        tracing::warn!("GitHub OAuth is not configured; /github routes will answer 503");
    }

    let pool = create_pool(DatabaseConfig {
        max_connections: config.database.max_connections,
        ..DatabaseConfig::new(config.database.url.clone())
    })
    .await?;
    run_migrations(&pool).await?;

    let github = GithubClient::new(Duration::from_secs(config.github_timeout_secs))?;
    let bind_address = config.bind_address();

    let state = AppState::new(config, Stores::postgres(pool.clone()), Arc::new(github));
    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "repofav_api=debug,repofav_shared=debug,tower_http=debug".into()
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
