/// PostgreSQL store
///
/// Thin adapter from the store traits to the model SQL. Unique violations are
/// surfaced as [`StoreError::Conflict`] with the violated constraint name.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    FavoriteStore, GithubAccountStore, SessionStore, StoreError, StoreResult, UserStore,
};
use crate::models::{
    favorite::Favorite,
    github_account::{GithubAccount, UpsertGithubAccount},
    session::{NewSession, Session},
    user::{CreateUser, User, UserSummary},
};

/// Store implementation over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique-constraint violations to `StoreError::Conflict`
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::Conflict(constraint);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> StoreResult<UserSummary> {
        User::create(
            &self.pool,
            CreateUser {
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            },
        )
        .await
        .map_err(map_unique_violation)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(Session::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, session: NewSession) -> StoreResult<Session> {
        Session::create(&self.pool, session)
            .await
            .map_err(map_unique_violation)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        Ok(Session::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl GithubAccountStore for PgStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<GithubAccount>> {
        Ok(GithubAccount::find_by_user_id(&self.pool, user_id).await?)
    }

    async fn upsert_by_user_id(&self, link: UpsertGithubAccount) -> StoreResult<GithubAccount> {
        Ok(GithubAccount::upsert(&self.pool, link).await?)
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    async fn list_by_user_id(&self, user_id: Uuid) -> StoreResult<Vec<Favorite>> {
        Ok(Favorite::list_by_user(&self.pool, user_id).await?)
    }

    async fn insert_or_get(
        &self,
        user_id: Uuid,
        repo_id: &str,
        repo_name: Option<&str>,
    ) -> StoreResult<(Favorite, bool)> {
        Ok(Favorite::insert_or_get(&self.pool, user_id, repo_id, repo_name).await?)
    }

    async fn delete_by_user_and_repo(&self, user_id: Uuid, repo_id: &str) -> StoreResult<bool> {
        Ok(Favorite::delete(&self.pool, user_id, repo_id).await?)
    }
}
