/// Domain services
///
/// Each service owns one slice of behaviour and talks to storage only through
/// the [`crate::store`] traits. All of them are cheap to clone (`Arc` inside)
/// and are built once at startup.
///
/// - [`session::SessionService`]: issue, resolve and revoke cookie sessions
/// - [`auth::AuthService`]: signup, login, logout, current user
/// - [`github::GithubService`]: OAuth linking and repository listing
/// - [`favorites::FavoritesService`]: per-user favorite repositories

pub mod auth;
pub mod favorites;
pub mod github;
pub mod session;

pub use auth::{AuthService, LoginOutcome};
pub use favorites::FavoritesService;
pub use github::{GithubService, GithubStatus};
pub use session::{IssuedSession, SessionService};
