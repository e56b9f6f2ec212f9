/// Database layer for repofav
///
/// # Modules
///
/// - `pool`: PostgreSQL pool creation, health check and shutdown
/// - `migrations`: embedded schema migrations
///
/// Row types and their SQL live in [`crate::models`].

pub mod migrations;
pub mod pool;
