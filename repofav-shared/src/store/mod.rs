/// Storage contracts
///
/// The services depend on these traits rather than on a connection pool, so
/// the same service code runs against PostgreSQL in production and against
/// the in-memory store in tests.
///
/// # Implementations
///
/// - [`postgres`]: sqlx/PostgreSQL, delegating to the `models` SQL
/// - [`memory`]: a single mutex-guarded set of tables with the same unique
///   constraints
///
/// # Atomicity
///
/// Uniqueness (user email, one GitHub link per user, one favorite per
/// `(user, repo)`) is enforced by the store itself. Callers never check-then-act.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    favorite::Favorite,
    github_account::{GithubAccount, UpsertGithubAccount},
    session::{NewSession, Session},
    user::{User, UserSummary},
};

pub mod memory;
pub mod postgres;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by normalized email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Finds a user by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Inserts a user; `StoreError::Conflict` if the email exists
    async fn insert(&self, email: &str, password_hash: &str) -> StoreResult<UserSummary>;
}

/// Session store. No expiry logic lives here.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Session>>;

    async fn insert(&self, session: NewSession) -> StoreResult<Session>;

    /// Deletes a session; returns false (not an error) if it was already gone
    async fn delete_by_id(&self, id: &str) -> StoreResult<bool>;
}

/// External account store for GitHub links
#[async_trait]
pub trait GithubAccountStore: Send + Sync {
    async fn find_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<GithubAccount>>;

    /// Atomic insert-or-overwrite keyed on `user_id`
    async fn upsert_by_user_id(&self, link: UpsertGithubAccount) -> StoreResult<GithubAccount>;
}

/// Favorites store
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn list_by_user_id(&self, user_id: Uuid) -> StoreResult<Vec<Favorite>>;

    /// Atomic insert-or-get keyed on `(user_id, repo_id)`; the flag is true
    /// when a new row was created
    async fn insert_or_get(
        &self,
        user_id: Uuid,
        repo_id: &str,
        repo_name: Option<&str>,
    ) -> StoreResult<(Favorite, bool)>;

    async fn delete_by_user_and_repo(&self, user_id: Uuid, repo_id: &str) -> StoreResult<bool>;
}

/// The full set of stores, wired once at startup and passed to the services
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub github_accounts: Arc<dyn GithubAccountStore>,
    pub favorites: Arc<dyn FavoriteStore>,

    /// Present when backed by PostgreSQL (used for health checks and shutdown)
    pub pool: Option<sqlx::PgPool>,
}

impl Stores {
    /// Stores backed by a PostgreSQL pool
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool.clone()));
        Self {
            users: store.clone(),
            sessions: store.clone(),
            github_accounts: store.clone(),
            favorites: store,
            pool: Some(pool),
        }
    }

    /// Stores backed by process memory, sharing `store` with the caller
    pub fn from_memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            sessions: store.clone(),
            github_accounts: store.clone(),
            favorites: store,
            pool: None,
        }
    }
}
