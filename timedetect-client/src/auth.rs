//! Bearer-token provider
//!
//! Fetches OAuth2 client-credentials tokens for the detection API and caches
//! them until their declared lifetime runs out. There is deliberately no
//! retry or backoff here: a failed exchange is reported to the caller, and
//! the previous cache entry (possibly expired) is kept so a retry can still
//! succeed later.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Token-endpoint configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// OAuth2 token endpoint URL
    pub token_url: String,
    /// Client id registered with the identity provider
    pub client_id: String,
    /// Client secret; never logged
    pub client_secret: String,
    /// Scope granting access to the detection API
    pub scope: String,
}

impl AuthConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TD_TOKEN_URL (required)
    /// - TD_CLIENT_ID (required)
    /// - TD_CLIENT_SECRET (required)
    /// - TD_SCOPE (optional, default: "timedetect-api")
    pub fn from_env() -> anyhow::Result<Self> {
        let token_url = std::env::var("TD_TOKEN_URL")
            .map_err(|_| anyhow::anyhow!("TD_TOKEN_URL environment variable not set"))?;
        let client_id = std::env::var("TD_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("TD_CLIENT_ID environment variable not set"))?;
        let client_secret = std::env::var("TD_CLIENT_SECRET")
            .map_err(|_| anyhow::anyhow!("TD_CLIENT_SECRET environment variable not set"))?;
        let scope =
            std::env::var("TD_SCOPE").unwrap_or_else(|_| "timedetect-api".to_string());

        Ok(Self {
            token_url,
            client_id,
            client_secret,
            scope,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.token_url.is_empty() {
            anyhow::bail!("token_url cannot be empty");
        }

        if !self.token_url.starts_with("http://") && !self.token_url.starts_with("https://") {
            anyhow::bail!("token_url must start with http:// or https://");
        }

        if self.client_id.is_empty() {
            anyhow::bail!("client_id cannot be empty");
        }

        if self.client_secret.is_empty() {
            anyhow::bail!("client_secret cannot be empty");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    fetched_at: Instant,
    lifetime: Duration,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() <= self.lifetime
    }
}

/// Caching token provider
///
/// Call [`TokenProvider::get_token`] whenever a token is needed; an exchange
/// is only performed when the cache is empty or past its lifetime.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    config: AuthConfig,
    http: Client,
    cached: Option<CachedToken>,
}

impl TokenProvider {
    /// Create a new token provider
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            cached: None,
        }
    }

    /// Create a token provider with a custom HTTP client
    pub fn with_client(config: AuthConfig, http: Client) -> Self {
        Self {
            config,
            http,
            cached: None,
        }
    }

    /// Return a valid bearer token, exchanging credentials if needed
    pub async fn get_token(&mut self) -> Result<String> {
        if let Some(cached) = &self.cached {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }
        self.fetch_new_token().await
    }

    async fn fetch_new_token(&mut self) -> Result<String> {
        debug!("exchanging client credentials for a new token");

        let form = [
            ("client_secret", self.config.client_secret.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", self.config.scope.as_str()),
        ];
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Keep whatever is cached; the caller may retry the exchange.
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), message));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        self.cached = Some(CachedToken {
            token: body.access_token.clone(),
            fetched_at: Instant::now(),
            lifetime: Duration::from_secs(body.expires_in),
        });

        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            token_url: "https://identity.example.com/connect/token".to_string(),
            client_id: "demo-client".to_string(),
            client_secret: "s3cret".to_string(),
            scope: "timedetect-api".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut cfg = config();
        assert!(cfg.validate().is_ok());

        cfg.token_url = "not-a-url".to_string();
        assert!(cfg.validate().is_err());

        cfg = config();
        cfg.client_secret = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_cached_token_freshness() {
        let cached = CachedToken {
            token: "tok".to_string(),
            fetched_at: Instant::now(),
            lifetime: Duration::from_secs(3600),
        };
        assert!(cached.is_fresh());

        let expired = CachedToken {
            token: "tok".to_string(),
            fetched_at: Instant::now() - Duration::from_secs(10),
            lifetime: Duration::from_secs(5),
        };
        assert!(!expired.is_fresh());
    }
}
