/// GitHub account link model and database operations
///
/// Each user has at most one linked GitHub account. Re-running the OAuth flow
/// overwrites the token and identity in place.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE github_accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     access_token TEXT NOT NULL,
///     github_user_id TEXT,
///     github_login TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX github_accounts_user_unique ON github_accounts (user_id);
/// ```

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Linked GitHub account
///
/// Not `Serialize`: the access token stays server-side.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GithubAccount {
    /// Row ID
    pub id: Uuid,

    /// Owning user (unique)
    pub user_id: Uuid,

    /// OAuth access token
    pub access_token: String,

    /// GitHub GraphQL node ID of the viewer
    pub github_user_id: Option<String>,

    /// GitHub login of the viewer
    pub github_login: Option<String>,

    /// When the link was first created
    pub created_at: DateTime<Utc>,

    /// When the token/identity was last refreshed
    pub updated_at: DateTime<Utc>,
}

/// Input for linking (or relinking) a GitHub account
#[derive(Debug, Clone)]
pub struct UpsertGithubAccount {
    pub user_id: Uuid,
    pub access_token: String,
    pub github_user_id: Option<String>,
    pub github_login: Option<String>,
}

impl GithubAccount {
    /// Finds the link for a user
    pub async fn find_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, GithubAccount>(
            r#"
            SELECT id, user_id, access_token, github_user_id, github_login,
                   created_at, updated_at
            FROM github_accounts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Inserts the link, or overwrites the existing one for the same user
    ///
    /// A single `INSERT .. ON CONFLICT (user_id) DO UPDATE` statement, so two
    /// concurrent callbacks for one user still leave exactly one row.
    pub async fn upsert(pool: &PgPool, data: UpsertGithubAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, GithubAccount>(
            r#"
            INSERT INTO github_accounts (user_id, access_token, github_user_id, github_login)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET access_token = EXCLUDED.access_token,
                          github_user_id = EXCLUDED.github_user_id,
                          github_login = EXCLUDED.github_login,
                          updated_at = NOW()
            RETURNING id, user_id, access_token, github_user_id, github_login,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.access_token)
        .bind(data.github_user_id)
        .bind(data.github_login)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }
}
