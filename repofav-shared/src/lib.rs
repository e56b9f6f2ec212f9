//! # repofav Shared Library
//!
//! This crate contains the domain core used by the repofav API server:
//! identity, sessions, GitHub account linking and favorites.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Storage contracts with PostgreSQL and in-memory implementations
//! - `auth`: Password hashing and session token utilities
//! - `github`: GitHub OAuth + GraphQL client
//! - `services`: Session, auth, GitHub link and favorites services
//! - `db`: Connection pool and migrations
//! - `error`: Domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod github;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the repofav shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
