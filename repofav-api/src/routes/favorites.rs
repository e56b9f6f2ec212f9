/// Favorite repository endpoints (all require a session)
///
/// - `GET /favorites` - List favorites, oldest first
/// - `POST /favorites` - Add; 201 when created, 200 when it already existed
/// - `DELETE /favorites/:repo_id` - Remove; 204 whether or not it existed

use crate::{app::AppState, error::ApiResult, middleware::session::AuthContext, routes::ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use repofav_shared::models::favorite::Favorite;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Add-favorite request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    #[validate(length(min = 1, max = 255, message = "repoId is required"))]
    pub repo_id: String,

    #[validate(length(max = 255, message = "repoName is too long"))]
    pub repo_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteListResponse {
    pub favorites: Vec<Favorite>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub favorite: Favorite,
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<FavoriteListResponse>> {
    let favorites = state.favorites.list(auth.user.id).await?;
    Ok(Json(FavoriteListResponse { favorites }))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<AddFavoriteRequest>,
) -> ApiResult<(StatusCode, Json<FavoriteResponse>)> {
    let (favorite, created) = state
        .favorites
        .add(auth.user.id, &req.repo_id, req.repo_name.as_deref())
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(FavoriteResponse { favorite })))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(repo_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.favorites.remove(auth.user.id, &repo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
