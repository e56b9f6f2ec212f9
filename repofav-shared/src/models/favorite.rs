/// Favorite repository model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE favorites (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     repo_id TEXT NOT NULL,
///     repo_name TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX favorites_user_repo_unique ON favorites (user_id, repo_id);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A repository favorited by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,

    /// GitHub repository node ID
    pub repo_id: String,

    /// `owner/name`, if the client sent it
    pub repo_name: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Row returned by [`Favorite::insert_or_get`]
#[derive(Debug, sqlx::FromRow)]
struct FavoriteUpsertRow {
    #[sqlx(flatten)]
    favorite: Favorite,
    inserted: bool,
}

impl Favorite {
    /// Lists a user's favorites, oldest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let favorites = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, repo_id, repo_name, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(favorites)
    }

    /// Inserts a favorite, or returns the existing row for `(user_id, repo_id)`
    ///
    /// The conflict branch rewrites `repo_id` with itself so the row is
    /// returned unchanged; `xmax = 0` only holds for a freshly inserted tuple.
    ///
    /// # Returns
    ///
    /// `(favorite, inserted)`
    pub async fn insert_or_get(
        pool: &PgPool,
        user_id: Uuid,
        repo_id: &str,
        repo_name: Option<&str>,
    ) -> Result<(Self, bool), sqlx::Error> {
        let row = sqlx::query_as::<_, FavoriteUpsertRow>(
            r#"
            INSERT INTO favorites (user_id, repo_id, repo_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, repo_id)
            DO UPDATE SET repo_id = favorites.repo_id
            RETURNING id, user_id, repo_id, repo_name, created_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(user_id)
        .bind(repo_id)
        .bind(repo_name)
        .fetch_one(pool)
        .await?;

        Ok((row.favorite, row.inserted))
    }

    /// Deletes a favorite; missing rows are not an error
    pub async fn delete(pool: &PgPool, user_id: Uuid, repo_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND repo_id = $2")
            .bind(user_id)
            .bind(repo_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_serializes_camel_case() {
        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            repo_id: "R_1".to_string(),
            repo_name: Some("octo/repo".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&favorite).unwrap();
        assert_eq!(json["repoId"], "R_1");
        assert_eq!(json["repoName"], "octo/repo");
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
