use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;

use super::types::TokenResponse;
use crate::core::clock::Clock;
use crate::core::config::EbayConfig;
use crate::core::error::Error;

const OAUTH_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";
const EXPIRY_MARGIN_SECS: i64 = 60;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Process-wide cache for the eBay OAuth application token.
///
/// Holds the token behind a mutex so concurrent callers serialize around a
/// single refresh instead of racing the token endpoint. Expiry is checked
/// against an injected [`Clock`] with a 60s safety margin already folded
/// into `expires_at`.
pub struct AppTokenCache {
    client: Client,
    config: EbayConfig,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<CachedToken>>,
}

impl AppTokenCache {
    pub fn new(config: EbayConfig, clock: Arc<dyn Clock>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            clock,
            cached: Mutex::new(None),
        })
    }

    /// Current bearer token, refreshed only when absent or expired.
    pub async fn get_token(&self) -> Result<String, Error> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(token) = cached.as_ref() {
            if now < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let response = self.request_token().await?;
        let ttl = response.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        let entry = CachedToken {
            access_token: response.access_token,
            expires_at: now + Duration::seconds(ttl),
        };
        let token = entry.access_token.clone();
        *cached = Some(entry);

        Ok(token)
    }

    async fn request_token(&self) -> Result<TokenResponse, Error> {
        tracing::debug!("requesting fresh eBay app token");

        let basic = general_purpose::STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        let response = self
            .client
            .post(&self.config.token_url)
            .header("Authorization", format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials"), ("scope", OAUTH_SCOPE)])
            .send()
            .await
            .map_err(|e| Error::AuthRequest(format!("token endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthRequest(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::AuthRequest(format!("invalid token response: {}", e)))
    }
}
