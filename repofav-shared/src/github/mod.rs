/// GitHub OAuth and GraphQL integration
///
/// [`GithubApi`] is the seam the link service talks to. [`client::GithubClient`]
/// implements it over HTTPS; tests substitute a fake.
///
/// # Flow
///
/// 1. Redirect the user to [`authorization_url`]
/// 2. Exchange the callback `code` for an access token
/// 3. Read `viewer { id login }` to label the link
/// 4. Later, list the viewer's repositories with the stored token

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod client;

pub use client::GithubClient;

/// GitHub authorize endpoint
pub const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

/// Scope requested during linking
pub const OAUTH_SCOPE: &str = "read:user";

/// Page size for repository listing
pub const REPOSITORY_PAGE_SIZE: u32 = 50;

/// Errors talking to GitHub
#[derive(Debug, Error)]
pub enum GithubError {
    /// The request did not finish within the client timeout
    #[error("GitHub request timed out")]
    Timeout,

    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("GitHub returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The token endpoint answered without an access token
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The GraphQL response carried an `errors` array
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// The payload did not have the expected shape
    #[error("invalid response from GitHub: {0}")]
    InvalidResponse(String),

    /// OAuth settings could not form a URL
    #[error("invalid OAuth configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GithubError::Timeout
        } else if err.is_decode() {
            GithubError::InvalidResponse(err.to_string())
        } else {
            GithubError::Network(err.to_string())
        }
    }
}

/// OAuth application credentials
#[derive(Clone)]
pub struct GithubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

impl fmt::Debug for GithubOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Builds the provider authorize URL for the configured app
pub fn authorization_url(config: &GithubOAuthConfig) -> Result<String, GithubError> {
    let url = reqwest::Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.callback_url.as_str()),
            ("scope", OAUTH_SCOPE),
        ],
    )
    .map_err(|e| GithubError::Config(e.to_string()))?;

    Ok(url.to_string())
}

/// The authenticated GitHub user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Viewer {
    /// GraphQL node ID
    pub id: String,
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
}

/// Repository node as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub name_with_owner: String,
    pub url: String,
    pub is_private: bool,
    pub updated_at: DateTime<Utc>,
    pub description: Option<String>,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub primary_language: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of the viewer's repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPage {
    pub repos: Vec<Repository>,
    pub page_info: PageInfo,
}

/// Operations the link service needs from GitHub
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Exchanges an OAuth callback code for an access token
    async fn exchange_code(
        &self,
        config: &GithubOAuthConfig,
        code: &str,
    ) -> Result<String, GithubError>;

    /// Reads `viewer { id login }`
    async fn fetch_viewer(&self, access_token: &str) -> Result<Viewer, GithubError>;

    /// Lists repositories owned by the viewer, most recently updated first
    async fn fetch_repositories(
        &self,
        access_token: &str,
        first: u32,
        after: Option<String>,
    ) -> Result<RepositoryPage, GithubError>;
}
