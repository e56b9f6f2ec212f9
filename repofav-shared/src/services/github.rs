/// GitHub account linking
///
/// One link per user, overwritten in place on every successful OAuth
/// callback. The stored access token is used for repository listing and is
/// never returned to clients.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::github::{
    authorization_url, GithubApi, GithubOAuthConfig, RepositoryPage, REPOSITORY_PAGE_SIZE,
};
use crate::models::github_account::{GithubAccount, UpsertGithubAccount};
use crate::store::GithubAccountStore;

/// Link state as shown to the owning user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubStatus {
    pub connected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_login: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_user_id: Option<String>,
}

impl GithubStatus {
    fn disconnected() -> Self {
        Self {
            connected: false,
            github_login: None,
            github_user_id: None,
        }
    }
}

impl From<GithubAccount> for GithubStatus {
    fn from(account: GithubAccount) -> Self {
        Self {
            connected: true,
            github_login: account.github_login,
            github_user_id: account.github_user_id,
        }
    }
}

#[derive(Clone)]
pub struct GithubService {
    accounts: Arc<dyn GithubAccountStore>,
    api: Arc<dyn GithubApi>,
    oauth: Option<GithubOAuthConfig>,
}

impl GithubService {
    /// `oauth` is `None` when the OAuth app is not configured; linking then
    /// fails with `NotConfigured`
    pub fn new(
        accounts: Arc<dyn GithubAccountStore>,
        api: Arc<dyn GithubApi>,
        oauth: Option<GithubOAuthConfig>,
    ) -> Self {
        Self {
            accounts,
            api,
            oauth,
        }
    }

    fn oauth_config(&self) -> ServiceResult<&GithubOAuthConfig> {
        self.oauth
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("GitHub OAuth is not configured".to_string()))
    }

    /// Provider URL to redirect the user to
    pub fn authorization_url(&self) -> ServiceResult<String> {
        authorization_url(self.oauth_config()?).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Finishes the OAuth dance and stores the link
    ///
    /// Exchanges `code`, reads the viewer, then upserts by `user_id`. Any
    /// GitHub failure aborts before the store is touched.
    pub async fn complete_link(&self, user_id: Uuid, code: &str) -> ServiceResult<GithubStatus> {
        if code.is_empty() {
            return Err(ServiceError::InvalidInput("Missing code".to_string()));
        }
        let config = self.oauth_config()?;

        let access_token = self.api.exchange_code(config, code).await?;
        let viewer = self.api.fetch_viewer(&access_token).await?;

        let account = self
            .accounts
            .upsert_by_user_id(UpsertGithubAccount {
                user_id,
                access_token,
                github_user_id: Some(viewer.id),
                github_login: Some(viewer.login),
            })
            .await?;

        info!(
            user_id = %user_id,
            github_login = account.github_login.as_deref().unwrap_or_default(),
            "GitHub account linked"
        );
        Ok(account.into())
    }

    /// Whether `user_id` has a link; reads the store only
    pub async fn status(&self, user_id: Uuid) -> ServiceResult<GithubStatus> {
        Ok(self
            .accounts
            .find_by_user_id(user_id)
            .await?
            .map(GithubStatus::from)
            .unwrap_or_else(GithubStatus::disconnected))
    }

    /// First page of the linked user's own repositories
    ///
    /// # Errors
    ///
    /// `Conflict("GitHub not connected")` without a link, `Upstream` when
    /// GitHub fails.
    pub async fn list_repositories(&self, user_id: Uuid) -> ServiceResult<RepositoryPage> {
        let account = self
            .accounts
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::Conflict("GitHub not connected".to_string()))?;

        let page = self
            .api
            .fetch_repositories(&account.access_token, REPOSITORY_PAGE_SIZE, None)
            .await?;

        Ok(page)
    }
}
