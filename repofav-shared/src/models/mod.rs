/// Database models for repofav
///
/// # Models
///
/// - `user`: Email/password accounts
/// - `session`: Server-side login sessions
/// - `github_account`: One-per-user GitHub OAuth link
/// - `favorite`: Favorited repositories
///
/// Each model exposes its SQL as associated functions taking a `&PgPool`; the
/// [`crate::store`] contracts wrap them for the services.

pub mod favorite;
pub mod github_account;
pub mod session;
pub mod user;
