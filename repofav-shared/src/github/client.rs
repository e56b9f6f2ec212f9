/// HTTPS client for the GitHub OAuth and GraphQL endpoints
///
/// Every call is single-shot: no retries, one client-wide timeout. Access
/// tokens are sent as bearer credentials and never logged.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GithubApi, GithubError, GithubOAuthConfig, PageInfo, Repository, RepositoryPage, Viewer};

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GRAPHQL_URL: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = concat!("repofav/", env!("CARGO_PKG_VERSION"));

const VIEWER_QUERY: &str = "query { viewer { id login } }";

const REPOSITORIES_QUERY: &str = r#"
query ($first: Int!, $after: String) {
  viewer {
    repositories(first: $first, after: $after, ownerAffiliations: OWNER, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo { hasNextPage endCursor }
      nodes {
        id
        name
        nameWithOwner
        url
        isPrivate
        updatedAt
        description
        stargazerCount
        forkCount
        primaryLanguage { name }
      }
    }
  }
}
"#;

/// Reqwest-backed [`GithubApi`]
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
}

impl GithubClient {
    /// Creates a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http })
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        access_token: &str,
        body: serde_json::Value,
    ) -> Result<T, GithubError> {
        let response = self
            .http
            .post(GRAPHQL_URL)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let payload: serde_json::Value = response.json().await?;
        parse_graphql(payload)
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn exchange_code(
        &self,
        config: &GithubOAuthConfig,
        code: &str,
    ) -> Result<String, GithubError> {
        debug!("Exchanging OAuth code for access token");

        let response = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({
                "client_id": config.client_id,
                "client_secret": config.client_secret,
                "code": code,
                "redirect_uri": config.callback_url,
            }))
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let payload: serde_json::Value = response.json().await?;
        parse_token_response(payload)
    }

    async fn fetch_viewer(&self, access_token: &str) -> Result<Viewer, GithubError> {
        let data: ViewerData = self
            .graphql(access_token, json!({ "query": VIEWER_QUERY }))
            .await?;

        let viewer = data.viewer;
        if viewer.id.is_empty() || viewer.login.is_empty() {
            return Err(GithubError::InvalidResponse(
                "viewer is missing id or login".to_string(),
            ));
        }

        Ok(viewer)
    }

    async fn fetch_repositories(
        &self,
        access_token: &str,
        first: u32,
        after: Option<String>,
    ) -> Result<RepositoryPage, GithubError> {
        let data: RepositoriesData = self
            .graphql(
                access_token,
                json!({
                    "query": REPOSITORIES_QUERY,
                    "variables": { "first": first, "after": after },
                }),
            )
            .await?;

        let connection = data.viewer.repositories;
        Ok(RepositoryPage {
            repos: connection.nodes.into_iter().flatten().collect(),
            page_info: connection.page_info,
        })
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!(status = status.as_u16(), "GitHub request failed");

    Err(GithubError::Http {
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Extracts `access_token` from the token endpoint body
///
/// GitHub answers 200 with `error`/`error_description` for a bad or reused
/// code, so a missing token is an error even on success.
pub(crate) fn parse_token_response(payload: serde_json::Value) -> Result<String, GithubError> {
    let body: TokenResponse = serde_json::from_value(payload)
        .map_err(|e| GithubError::InvalidResponse(e.to_string()))?;

    match body.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(GithubError::TokenExchange(
            body.error_description
                .or(body.error)
                .unwrap_or_else(|| "No access_token returned from GitHub".to_string()),
        )),
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

/// Unwraps a GraphQL envelope; a non-empty `errors` array wins over `data`
pub(crate) fn parse_graphql<T: DeserializeOwned>(
    payload: serde_json::Value,
) -> Result<T, GithubError> {
    let envelope: GraphqlResponse<T> = serde_json::from_value(payload)
        .map_err(|e| GithubError::InvalidResponse(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(GithubError::GraphQl(messages.join("; ")));
    }

    envelope
        .data
        .ok_or_else(|| GithubError::InvalidResponse("missing data".to_string()))
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct RepositoriesData {
    viewer: RepositoriesViewer,
}

#[derive(Debug, Deserialize)]
struct RepositoriesViewer {
    repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Option<Repository>>,
}
