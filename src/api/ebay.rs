use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::auth::AppTokenCache;
use super::types::{ItemSummary, Listing, SearchQuery, SearchResponse};
use crate::core::clock::Clock;
use crate::core::config::EbayConfig;
use crate::core::error::Error;
use crate::core::retry::RetryPolicy;
use crate::pipeline::ListingSource;

const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";
const SEARCH_LIMIT: u32 = 50;
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the eBay Buy/Browse item-summary search.
///
/// The marketplace cannot filter on blocklisted title words or image
/// presence server-side, so those checks happen here after the response
/// comes back sorted ascending by price.
pub struct EbayClient {
    client: Client,
    config: EbayConfig,
    tokens: AppTokenCache,
    retry: RetryPolicy,
}

impl EbayClient {
    pub fn new(config: EbayConfig, clock: Arc<dyn Clock>) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {}", e)))?;
        let tokens = AppTokenCache::new(config.clone(), clock)?;

        Ok(Self {
            client,
            config,
            tokens,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the default 3-attempt / 5s-base retry schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Cheapest fixed-price listing under the ceiling that passes the
    /// blocklist and carries an image, or `None` when nothing qualifies.
    pub async fn find_best_listing(&self, query: &SearchQuery) -> Result<Option<Listing>, Error> {
        let response = self.retry.run(|| self.fetch_results(query)).await?;
        select_listing(response.item_summaries, &query.blocked_words)
    }

    async fn fetch_results(&self, query: &SearchQuery) -> Result<SearchResponse, Error> {
        let token = self.tokens.get_token().await?;
        let url = format!("{}{}", self.config.api_base, SEARCH_PATH);
        let filter = format!(
            "buyingOptions:{{FIXED_PRICE}},price:{{0..{}}}",
            query.max_price
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header("X-EBAY-C-MARKETPLACE-ID", &self.config.marketplace_id)
            .query(&[
                ("q", query.term.clone()),
                ("filter", filter),
                ("sort", "price".to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::SearchRequest(format!("search endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SearchRequest(format!(
                "search returned {}: {}",
                status, body
            )));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| Error::SearchRequest(format!("invalid search response: {}", e)))
    }
}

#[async_trait]
impl ListingSource for EbayClient {
    async fn find_best_listing(&self, query: &SearchQuery) -> Result<Option<Listing>, Error> {
        EbayClient::find_best_listing(self, query).await
    }
}

/// First entry passing both filters wins; results arrive sorted ascending
/// by price, so that is the cheapest qualifying listing.
fn select_listing(
    items: Vec<ItemSummary>,
    blocked_words: &[String],
) -> Result<Option<Listing>, Error> {
    for item in items {
        if title_blocked(&item.title, blocked_words) {
            tracing::debug!("skipping '{}': blocked word in title", item.title);
            continue;
        }
        if item.image_url().is_none() {
            tracing::debug!("skipping '{}': no image", item.title);
            continue;
        }
        return item.into_listing().map(Some);
    }

    Ok(None)
}

fn title_blocked(title: &str, blocked_words: &[String]) -> bool {
    let title = title.to_lowercase();
    blocked_words
        .iter()
        .any(|word| title.contains(&word.to_lowercase()))
}
