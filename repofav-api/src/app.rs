/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use repofav_api::{app::{build_router, AppState}, config::Config};
/// use repofav_shared::{db::pool::{create_pool, DatabaseConfig}, store::Stores};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::new(config.database.url.clone())).await?;
/// let github = Arc::new(repofav_shared::github::GithubClient::new(
///     std::time::Duration::from_secs(config.github_timeout_secs),
/// )?);
/// let state = AppState::new(config, Stores::postgres(pool), github);
/// let app = build_router(state)?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use repofav_shared::{
    github::GithubApi,
    services::{AuthService, FavoritesService, GithubService, SessionService},
    store::Stores,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; everything inside is
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stores: Stores,
    pub auth: AuthService,
    pub sessions: SessionService,
    pub github: GithubService,
    pub favorites: FavoritesService,
}

impl AppState {
    /// Wires the services over `stores`, talking to GitHub through `github_api`
    pub fn new(config: Config, stores: Stores, github_api: Arc<dyn GithubApi>) -> Self {
        let sessions = SessionService::new(stores.users.clone(), stores.sessions.clone());
        let auth = AuthService::new(stores.users.clone(), sessions.clone(), config.password);
        let github = GithubService::new(
            stores.github_accounts.clone(),
            github_api,
            config.github.clone(),
        );
        let favorites = FavoritesService::new(stores.favorites.clone());

        Self {
            config: Arc::new(config),
            stores,
            auth,
            sessions,
            github,
            favorites,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth
/// │   ├── POST /signup
/// │   ├── POST /login
/// │   ├── POST /logout
/// │   └── GET  /me                    (session)
/// ├── /github                         (session)
/// │   ├── GET /oauth/start
/// │   ├── GET /oauth/callback
/// │   ├── GET /me
/// │   └── GET /repos
/// └── /favorites                      (session)
///     ├── GET    /
///     ├── POST   /
///     └── DELETE /:repo_id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS limited to `APP_URL`, with credentials
/// 3. Security headers
/// 4. Session authentication (per-route basis)
///
/// # Errors
///
/// Returns an error if `APP_URL` cannot be used as a CORS origin
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use crate::{middleware::session::require_session, routes};

    let session_layer =
        || axum::middleware::from_fn_with_state(state.clone(), require_session);

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .layer(session_layer())
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let github_routes = Router::new()
        .route("/oauth/start", get(routes::github::oauth_start))
        .route("/oauth/callback", get(routes::github::oauth_callback))
        .route("/me", get(routes::github::status))
        .route("/repos", get(routes::github::repositories))
        .layer(session_layer());

    let favorite_routes = Router::new()
        .route(
            "/",
            get(routes::favorites::list_favorites).post(routes::favorites::add_favorite),
        )
        .route("/:repo_id", delete(routes::favorites::remove_favorite))
        .layer(session_layer());

    let cors = CorsLayer::new()
        .allow_origin(state.config.api.cors_origin()?)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600));

    let security = SecurityHeadersLayer::new(state.config.api.production);

    Ok(Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/github", github_routes)
        .nest("/favorites", favorite_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(security)
        .with_state(state))
}
