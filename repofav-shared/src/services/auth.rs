/// Email/password accounts
///
/// Emails are normalized (trimmed, lower-cased) before every store call.
/// Argon2 work runs on the blocking pool so it never stalls the runtime.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::session::SessionService;
use crate::auth::password::{verify_password, PasswordPolicy};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{normalize_email, UserSummary};
use crate::store::UserStore;

/// Minimum accepted password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: SessionService,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, sessions: SessionService, policy: PasswordPolicy) -> Self {
        Self {
            users,
            sessions,
            policy,
        }
    }

    /// Creates an account
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty email or a short password
    /// - `Conflict("Email already in use")` if the email is taken
    pub async fn signup(&self, email: &str, password: &str) -> ServiceResult<UserSummary> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::InvalidInput("Invalid email".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = self.hash_blocking(password.to_string()).await?;

        let user = self
            .users
            .insert(&email, &password_hash)
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::Conflict(_) => {
                    ServiceError::Conflict("Email already in use".to_string())
                }
                other => other,
            })?;

        info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    /// Checks credentials and opens a session
    ///
    /// Unknown email and wrong password fail identically. The unknown-email
    /// path still pays for one hash so response time does not reveal which.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<LoginOutcome> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            self.hash_blocking(password.to_string()).await?;
            return Err(invalid_credentials());
        };

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::Internal(format!("Password task failed: {}", e)))??;

        if !matches {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }

        let session = self.sessions.create(user.id).await?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            session_token: session.token,
            expires_at: session.expires_at,
            user: user.summary(),
        })
    }

    /// Ends the session behind `token`; a missing token is a no-op
    pub async fn logout(&self, token: Option<&str>) -> ServiceResult<()> {
        match token {
            Some(token) if !token.is_empty() => self.sessions.revoke(token).await,
            _ => Ok(()),
        }
    }

    /// Current user for a session token
    pub async fn me(&self, token: &str) -> ServiceResult<UserSummary> {
        self.sessions.resolve(token).await
    }

    async fn hash_blocking(&self, password: String) -> ServiceResult<String> {
        let policy = self.policy;
        let hash = tokio::task::spawn_blocking(move || policy.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(format!("Password task failed: {}", e)))??;
        Ok(hash)
    }
}

fn invalid_credentials() -> ServiceError {
    ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string())
}
