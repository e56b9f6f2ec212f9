/// Schema migrations
///
/// Migrations are embedded from `repofav-shared/migrations/` at compile time
/// as reversible `{version}_{name}.up.sql` / `.down.sql` pairs.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies every pending migration
///
/// # Errors
///
/// Fails if a migration does not apply or an applied one was edited.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Creates the database named in `database_url` when it is missing
///
/// Used by the PostgreSQL test suites; production databases are provisioned
/// ahead of time.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
    } else {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }

    Ok(())
}
