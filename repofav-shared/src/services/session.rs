/// Session lifecycle
///
/// The cookie carries an opaque random token; storage only ever sees its
/// SHA-256 digest. Expiry is checked on read and an expired row is deleted
/// on the spot.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::auth::session_token::{generate_session_token, hash_session_token};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{session::NewSession, user::UserSummary};
use crate::store::{SessionStore, UserStore};

/// Lifetime of a new session
pub const SESSION_TTL_DAYS: i64 = 7;

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// A freshly created session; `token` goes into the cookie
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Issues a session for `user_id` valid for [`SESSION_TTL_DAYS`]
    pub async fn create(&self, user_id: Uuid) -> ServiceResult<IssuedSession> {
        let token = generate_session_token();
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

        self.sessions
            .insert(NewSession {
                id: hash_session_token(&token),
                user_id,
                expires_at,
            })
            .await?;

        debug!(user_id = %user_id, expires_at = %expires_at, "Session created");
        Ok(IssuedSession { token, expires_at })
    }

    /// Resolves a cookie token to its user
    ///
    /// Unknown, expired and orphaned sessions all fail with the same
    /// `Unauthenticated` message.
    pub async fn resolve(&self, token: &str) -> ServiceResult<UserSummary> {
        if token.is_empty() {
            return Err(unauthenticated());
        }

        let id = hash_session_token(token);
        let session = self
            .sessions
            .find_by_id(&id)
            .await?
            .ok_or_else(unauthenticated)?;

        if session.is_expired_at(Utc::now()) {
            self.sessions.delete_by_id(&id).await?;
            debug!(user_id = %session.user_id, "Expired session removed");
            return Err(unauthenticated());
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(unauthenticated)?;

        Ok(user.summary())
    }

    /// Deletes the session behind `token`; unknown tokens are fine
    pub async fn revoke(&self, token: &str) -> ServiceResult<()> {
        let removed = self
            .sessions
            .delete_by_id(&hash_session_token(token))
            .await?;
        debug!(removed, "Session revoked");
        Ok(())
    }
}

fn unauthenticated() -> ServiceError {
    ServiceError::Unauthenticated(NOT_AUTHENTICATED.to_string())
}
