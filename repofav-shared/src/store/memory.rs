/// In-memory store
///
/// All tables sit behind one `tokio::sync::Mutex`, so every trait method is a
/// single critical section and the unique constraints hold under concurrent
/// callers exactly as the PostgreSQL indexes do. Foreign keys are not
/// enforced, which lets tests build orphaned sessions.
///
/// # Example
///
/// ```
/// use repofav_shared::store::{memory::MemoryStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.insert("a@b.com", "$argon2id$...").await?;
/// assert!(store.insert("a@b.com", "$argon2id$...").await.is_err());
/// assert_eq!(store.find_by_id(user.id).await?.map(|u| u.email), Some("a@b.com".to_string()));
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    FavoriteStore, GithubAccountStore, SessionStore, StoreError, StoreResult, UserStore,
};
use crate::models::{
    favorite::Favorite,
    github_account::{GithubAccount, UpsertGithubAccount},
    session::{NewSession, Session},
    user::{User, UserSummary},
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    github_accounts: HashMap<Uuid, GithubAccount>,
    favorites: Vec<Favorite>,
}

/// Mutex-guarded tables implementing every store trait
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }

    /// Number of stored GitHub links
    pub async fn github_account_count(&self) -> usize {
        self.tables.lock().await.github_accounts.len()
    }

    /// Number of stored favorites across all users
    pub async fn favorite_count(&self) -> usize {
        self.tables.lock().await.favorites.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> StoreResult<UserSummary> {
        let mut tables = self.tables.lock().await;

        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("users_email_unique".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let summary = user.summary();
        tables.users.insert(user.id, user);

        Ok(summary)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.tables.lock().await.sessions.get(id).cloned())
    }

    async fn insert(&self, session: NewSession) -> StoreResult<Session> {
        let mut tables = self.tables.lock().await;

        if tables.sessions.contains_key(&session.id) {
            return Err(StoreError::Conflict("sessions_pkey".to_string()));
        }

        let row = Session {
            id: session.id,
            user_id: session.user_id,
            created_at: Utc::now(),
            expires_at: session.expires_at,
        };
        tables.sessions.insert(row.id.clone(), row.clone());

        Ok(row)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        Ok(self.tables.lock().await.sessions.remove(id).is_some())
    }
}

#[async_trait]
impl GithubAccountStore for MemoryStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> StoreResult<Option<GithubAccount>> {
        Ok(self.tables.lock().await.github_accounts.get(&user_id).cloned())
    }

    async fn upsert_by_user_id(&self, link: UpsertGithubAccount) -> StoreResult<GithubAccount> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();

        let account = tables
            .github_accounts
            .entry(link.user_id)
            .and_modify(|existing| {
                existing.access_token = link.access_token.clone();
                existing.github_user_id = link.github_user_id.clone();
                existing.github_login = link.github_login.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| GithubAccount {
                id: Uuid::new_v4(),
                user_id: link.user_id,
                access_token: link.access_token.clone(),
                github_user_id: link.github_user_id.clone(),
                github_login: link.github_login.clone(),
                created_at: now,
                updated_at: now,
            });

        Ok(account.clone())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn list_by_user_id(&self, user_id: Uuid) -> StoreResult<Vec<Favorite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_or_get(
        &self,
        user_id: Uuid,
        repo_id: &str,
        repo_name: Option<&str>,
    ) -> StoreResult<(Favorite, bool)> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.repo_id == repo_id)
        {
            return Ok((existing.clone(), false));
        }

        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id,
            repo_id: repo_id.to_string(),
            repo_name: repo_name.map(str::to_string),
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());

        Ok((favorite, true))
    }

    async fn delete_by_user_and_repo(&self, user_id: Uuid, repo_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.repo_id == repo_id));
        Ok(tables.favorites.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = MemoryStore::new();
        UserStore::insert(&store, "a@b.com", "h1").await.unwrap();

        let err = UserStore::insert(&store, "a@b.com", "h2").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(c) if c == "users_email_unique"));
    }

    #[tokio::test]
    async fn test_session_delete_is_idempotent() {
        let store = MemoryStore::new();
        SessionStore::insert(
            &store,
            NewSession {
                id: "s1".to_string(),
                user_id: Uuid::new_v4(),
                expires_at: Utc::now() + Duration::days(1),
            },
        )
        .await
        .unwrap();

        assert!(store.delete_by_id("s1").await.unwrap());
        assert!(!store.delete_by_id("s1").await.unwrap());
        assert!(!store.delete_by_id("never-existed").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_in_place() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let first = store
            .upsert_by_user_id(UpsertGithubAccount {
                user_id,
                access_token: "t1".to_string(),
                github_user_id: Some("U_1".to_string()),
                github_login: Some("old".to_string()),
            })
            .await
            .unwrap();
        let second = store
            .upsert_by_user_id(UpsertGithubAccount {
                user_id,
                access_token: "t2".to_string(),
                github_user_id: Some("U_1".to_string()),
                github_login: Some("new".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.access_token, "t2");
        assert_eq!(second.github_login.as_deref(), Some("new"));
        assert_eq!(store.github_account_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_favorite_inserts_create_one_row() {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_or_get(user_id, "R1", Some("x/y")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            let (_, inserted) = handle.await.unwrap().unwrap();
            if inserted {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.favorite_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_upserts_keep_one_link() {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .upsert_by_user_id(UpsertGithubAccount {
                            user_id,
                            access_token: format!("t{}", i),
                            github_user_id: Some("U_1".to_string()),
                            github_login: Some("octocat".to_string()),
                        })
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.github_account_count().await, 1);

        let account = store.find_by_user_id(user_id).await.unwrap().unwrap();
        let submitted: Vec<String> = (0..16).map(|i| format!("t{}", i)).collect();
        assert!(submitted.contains(&account.access_token));
    }

    #[tokio::test]
    async fn test_favorites_scoped_per_user() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert_or_get(alice, "R1", None).await.unwrap();
        store.insert_or_get(bob, "R1", None).await.unwrap();
        store.delete_by_user_and_repo(alice, "R1").await.unwrap();

        assert!(store.list_by_user_id(alice).await.unwrap().is_empty());
        assert_eq!(store.list_by_user_id(bob).await.unwrap().len(), 1);
    }
}
