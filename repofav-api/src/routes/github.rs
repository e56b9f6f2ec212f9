/// GitHub linking endpoints (all require a session)
///
/// - `GET /github/oauth/start` - 302 to GitHub's authorize page
/// - `GET /github/oauth/callback?code=` - Link the account, 302 to `{APP_URL}/profile`
/// - `GET /github/me` - Link status
/// - `GET /github/repos` - First page of the user's repositories

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::AuthContext,
};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    Extension, Json,
};
use repofav_shared::{github::RepositoryPage, services::GithubStatus};
use serde::Deserialize;

/// Query string GitHub sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

type Redirect = (StatusCode, [(header::HeaderName, String); 1]);

fn found(location: String) -> Redirect {
    (StatusCode::FOUND, [(header::LOCATION, location)])
}

/// Start linking
///
/// # Errors
///
/// - `503 Service Unavailable`: GitHub OAuth is not configured
pub async fn oauth_start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Redirect> {
    let url = state.github.authorization_url()?;
    tracing::debug!(user_id = %auth.user.id, "Redirecting to GitHub authorize");
    Ok(found(url))
}

/// Finish linking
///
/// # Errors
///
/// - `400 Bad Request`: No `code` in the query
/// - `502 Bad Gateway`: Token exchange or viewer lookup failed
pub async fn oauth_callback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Redirect> {
    let code = params.code.filter(|c| !c.is_empty()).ok_or_else(|| {
        if let Some(error) = &params.error {
            tracing::info!(user_id = %auth.user.id, error = %error, "GitHub authorization declined");
        }
        ApiError::BadRequest("Missing code".to_string())
    })?;

    state.github.complete_link(auth.user.id, &code).await?;
    Ok(found(state.config.profile_url()))
}

/// Link status for the current user
pub async fn status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<GithubStatus>> {
    Ok(Json(state.github.status(auth.user.id).await?))
}

/// Repositories owned by the linked GitHub account
///
/// # Errors
///
/// - `409 Conflict`: GitHub not connected
/// - `502 Bad Gateway`: GitHub failed
pub async fn repositories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<RepositoryPage>> {
    Ok(Json(state.github.list_repositories(auth.user.id).await?))
}
