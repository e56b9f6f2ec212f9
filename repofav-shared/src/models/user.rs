/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_email_unique ON users (email);
/// ```
///
/// # Example
///
/// ```no_run
/// use repofav_shared::models::user::{User, CreateUser};
/// use repofav_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an email/password account
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. Convert to [`UserSummary`] before returning a user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, trimmed and lower-cased
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// When the user account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public projection of the user
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Public view of a user: `{id, email}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Normalized email address
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Normalizes an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a database error carrying the `users_email_unique` constraint if
    /// the email already exists.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<UserSummary, sqlx::Error> {
        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by (normalized) email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
        assert_eq!(normalize_email("a@b.com"), "a@b.com");
    }

    #[test]
    fn test_summary_drops_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.summary()).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
