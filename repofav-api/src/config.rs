/// Configuration management for the API server
///
/// Configuration is read once from the environment (after loading `.env` if
/// present) and handed to [`crate::app::AppState`].
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3001)
/// - `APP_URL`: Frontend origin for CORS and post-OAuth redirects (default: http://localhost:8080)
/// - `PRODUCTION`: Enables `Secure` cookies and HSTS (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`, `GITHUB_CALLBACK_URL`: OAuth app; all or none
/// - `GITHUB_HTTP_TIMEOUT_SECS`: Outbound GitHub timeout (default: 10)
/// - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`, `PASSWORD_HASH_PARALLELISM`: Argon2id cost
/// - `RUST_LOG`: Log filter; `LOG_FORMAT=json` switches to JSON output
///
/// # Example
///
/// ```no_run
/// use repofav_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use axum::http::HeaderValue;
use repofav_shared::{auth::password::PasswordPolicy, github::GithubOAuthConfig};
use std::{env, str::FromStr};
use url::Url;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,

    /// `None` when GitHub linking is not set up
    pub github: Option<GithubOAuthConfig>,

    /// Outbound GitHub request timeout in seconds
    pub github_timeout_secs: u64,

    pub password: PasswordPolicy,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Frontend origin, e.g. `http://localhost:8080`
    pub app_url: String,

    /// Production mode: `Secure` cookies, HSTS
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` is missing
    /// - A numeric or boolean variable does not parse
    /// - Only some of the GitHub OAuth variables are set
    /// - `APP_URL` or `GITHUB_CALLBACK_URL` is not an http(s) URL
    /// - The `PASSWORD_HASH_*` costs are rejected by Argon2
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api = ApiConfig {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("API_PORT", 3001)?,
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            production: parse_var("PRODUCTION", false)?,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
        };

        let github = github_from_parts(
            env::var("GITHUB_CLIENT_ID").ok(),
            env::var("GITHUB_CLIENT_SECRET").ok(),
            env::var("GITHUB_CALLBACK_URL").ok(),
        )?;

        api.cors_origin()?;

        let defaults = PasswordPolicy::default();
        let password = check_password_policy(PasswordPolicy {
            memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_var("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_var("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        })?;

        Ok(Self {
            api,
            database,
            github,
            github_timeout_secs: parse_var("GITHUB_HTTP_TIMEOUT_SECS", 10)?,
            password,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Where the OAuth callback sends the browser when linking finishes
    pub fn profile_url(&self) -> String {
        format!("{}/profile", self.api.app_url)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value: {}", name, e)),
        _ => Ok(default),
    }
}

impl ApiConfig {
    /// `APP_URL` as a CORS origin (scheme, host and port only)
    ///
    /// # Errors
    ///
    /// Returns an error if `APP_URL` is not an absolute http(s) URL
    pub fn cors_origin(&self) -> anyhow::Result<HeaderValue> {
        let url = parse_http_url("APP_URL", &self.app_url)?;
        HeaderValue::from_str(&url.origin().ascii_serialization())
            .map_err(|e| anyhow::anyhow!("APP_URL is not a valid origin: {}", e))
    }
}

/// Parses an absolute http(s) URL with a host
fn parse_http_url(name: &str, value: &str) -> anyhow::Result<Url> {
    let url =
        Url::parse(value).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        anyhow::bail!("{} must be an http(s) URL with a host", name);
    }

    Ok(url)
}

/// Rejects Argon2 costs that would fail every hash at request time
fn check_password_policy(policy: PasswordPolicy) -> anyhow::Result<PasswordPolicy> {
    policy
        .validate()
        .map_err(|e| anyhow::anyhow!("PASSWORD_HASH_* settings are invalid: {}", e))?;
    Ok(policy)
}

/// All three GitHub settings, or none
fn github_from_parts(
    client_id: Option<String>,
    client_secret: Option<String>,
    callback_url: Option<String>,
) -> anyhow::Result<Option<GithubOAuthConfig>> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    match (
        non_empty(client_id),
        non_empty(client_secret),
        non_empty(callback_url),
    ) {
        (Some(client_id), Some(client_secret), Some(callback_url)) => {
            parse_http_url("GITHUB_CALLBACK_URL", &callback_url)?;
            Ok(Some(GithubOAuthConfig {
                client_id,
                client_secret,
                callback_url,
            }))
        }
        (None, None, None) => Ok(None),
        _ => anyhow::bail!(
            "GITHUB_CLIENT_ID, GITHUB_CLIENT_SECRET and GITHUB_CALLBACK_URL must be set together"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                app_url: "http://localhost:8080".to_string(),
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            github: None,
            github_timeout_secs: 10,
            password: PasswordPolicy::default(),
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(config().bind_address(), "127.0.0.1:3001");
    }

    #[test]
    fn test_profile_url() {
        assert_eq!(config().profile_url(), "http://localhost:8080/profile");
    }

    #[test]
    fn test_github_all_or_none() {
        assert!(github_from_parts(None, None, None).unwrap().is_none());

        let full = github_from_parts(
            Some("id".to_string()),
            Some("secret".to_string()),
            Some("http://localhost:3001/github/oauth/callback".to_string()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(full.client_id, "id");

        assert!(github_from_parts(Some("id".to_string()), None, None).is_err());
        assert!(github_from_parts(None, Some("secret".to_string()), Some(" ".to_string())).is_err());
    }

    #[test]
    fn test_blank_github_values_count_as_unset() {
        let github = github_from_parts(
            Some(String::new()),
            Some("  ".to_string()),
            Some(String::new()),
        )
        .unwrap();
        assert!(github.is_none());
    }

    #[test]
    fn test_github_callback_must_be_http_url() {
        let parts = |callback: &str| {
            github_from_parts(
                Some("id".to_string()),
                Some("secret".to_string()),
                Some(callback.to_string()),
            )
        };

        assert!(parts("not a url").is_err());
        assert!(parts("localhost:3001/github/oauth/callback").is_err());
        assert!(parts("ftp://example.com/callback").is_err());
        assert!(parts("https://api.example.com/github/oauth/callback").is_ok());
    }

    #[test]
    fn test_cors_origin_from_app_url() {
        let mut config = config();
        assert_eq!(config.api.cors_origin().unwrap(), "http://localhost:8080");

        config.api.app_url = "https://app.example.com/dashboard".to_string();
        assert_eq!(config.api.cors_origin().unwrap(), "https://app.example.com");

        config.api.app_url = "app.example.com".to_string();
        assert!(config.api.cors_origin().is_err());

        config.api.app_url = String::new();
        assert!(config.api.cors_origin().is_err());
    }

    #[test]
    fn test_password_policy_with_zero_passes_is_rejected() {
        let policy = PasswordPolicy {
            iterations: 0,
            ..PasswordPolicy::default()
        };
        assert!(check_password_policy(policy).is_err());

        let too_little_memory = PasswordPolicy {
            memory_kib: 1,
            ..PasswordPolicy::default()
        };
        assert!(check_password_policy(too_little_memory).is_err());

        assert_eq!(
            check_password_policy(PasswordPolicy::default()).unwrap(),
            PasswordPolicy::default()
        );
    }
}
