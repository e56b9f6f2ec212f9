/// PostgreSQL connection pool
///
/// # Example
///
/// ```no_run
/// use repofav_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig::new("postgresql://localhost/repofav")).await?;
/// close_pool(pool).await;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pool settings. Timeouts are in seconds so they map directly onto env vars.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,

    /// Upper bound on open connections (default 10)
    pub max_connections: u32,

    /// How long a request waits for a free connection (default 30)
    pub acquire_timeout_seconds: u64,

    /// Idle connections are closed after this long; `None` keeps them open
    pub idle_timeout_seconds: Option<u64>,
}

impl DatabaseConfig {
    /// Defaults with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
        }
    }
}

/// Connects and verifies the database answers before handing the pool out
///
/// # Errors
///
/// Fails on an invalid URL, an unreachable server or a failed health check.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Creating database connection pool"
    );

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        options = options.idle_timeout(Duration::from_secs(idle_timeout));
        debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
    }

    let pool = options.connect(&config.url).await?;
    health_check(&pool).await?;

    info!("Database connection pool ready");
    Ok(pool)
}

/// Runs `SELECT 1` against the pool
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (value,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if value == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!(value, "Database health check returned unexpected value");
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Closes every connection; call once on shutdown
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_seconds, 30);
        assert_eq!(config.idle_timeout_seconds, Some(600));
    }

    #[test]
    fn test_database_config_new_keeps_defaults() {
        let config = DatabaseConfig::new("postgresql://localhost/repofav");
        assert_eq!(config.url, "postgresql://localhost/repofav");
        assert_eq!(config.max_connections, 10);
    }
}
