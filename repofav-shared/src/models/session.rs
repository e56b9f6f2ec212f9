/// Session model and database operations
///
/// A session row is keyed by the SHA-256 digest of the cookie token (see
/// [`crate::auth::session_token`]). The table holds no expiry logic; expired
/// rows are removed lazily by the session service when they are next read.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id TEXT PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Session row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Token digest
    pub id: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Checks whether the session has expired at `now`
    ///
    /// A session whose `expires_at` equals `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Input for inserting a session
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Token digest
    pub id: String,

    /// Owning user
    pub user_id: Uuid,

    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Inserts a session
    pub async fn create(pool: &PgPool, data: NewSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, created_at, expires_at
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by its token digest
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session
    ///
    /// Returns false if no row existed. Never an error for a missing row.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
