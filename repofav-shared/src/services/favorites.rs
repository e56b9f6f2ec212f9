/// Favorite repositories
///
/// Adding is idempotent: a repeat add for the same `(user, repo)` returns the
/// stored row instead of failing.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::favorite::Favorite;
use crate::store::FavoriteStore;

#[derive(Clone)]
pub struct FavoritesService {
    favorites: Arc<dyn FavoriteStore>,
}

impl FavoritesService {
    pub fn new(favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { favorites }
    }

    /// The user's favorites, oldest first
    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<Favorite>> {
        Ok(self.favorites.list_by_user_id(user_id).await?)
    }

    /// Adds a favorite keyed on `repo_id` as given; the flag is true when a
    /// new row was created
    pub async fn add(
        &self,
        user_id: Uuid,
        repo_id: &str,
        repo_name: Option<&str>,
    ) -> ServiceResult<(Favorite, bool)> {
        if repo_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("repoId is required".to_string()));
        }

        let (favorite, created) = self
            .favorites
            .insert_or_get(user_id, repo_id, repo_name)
            .await?;

        debug!(user_id = %user_id, repo_id, created, "Favorite added");
        Ok((favorite, created))
    }

    /// Removes a favorite; removing one that is not there succeeds
    pub async fn remove(&self, user_id: Uuid, repo_id: &str) -> ServiceResult<()> {
        let removed = self
            .favorites
            .delete_by_user_and_repo(user_id, repo_id)
            .await?;

        debug!(user_id = %user_id, repo_id, removed, "Favorite removed");
        Ok(())
    }
}
