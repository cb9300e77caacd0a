use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::api::types::Listing;
use crate::core::config::TelegramConfig;
use crate::core::error::Error;
use crate::pipeline::AlertSink;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Opens the listing directly in the eBay app when it is installed.
pub fn deep_link(item_id: &str) -> String {
    format!("ebay://com.ebay.mobile/ebay/link/?nav=item.view&id={}", item_id)
}

/// Sends deal alerts to a Telegram chat: a photo message with caption when
/// the listing has an image, a plain text message otherwise.
#[derive(Debug)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    ok: bool,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, Error> {
        if config.bot_token.trim().is_empty() {
            return Err(Error::Configuration("TG_BOT_TOKEN must be set".into()));
        }
        if config.chat_id.trim().is_empty() {
            return Err(Error::Configuration("CHAT_ID must be set".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// `true` only when Telegram accepted the message. Delivery problems
    /// are logged and reported as `false`, never raised.
    pub async fn send_alert(&self, listing: &Listing) -> bool {
        let caption = build_caption(listing);

        let (url, payload) = match listing.image_url.as_deref().filter(|url| !url.is_empty()) {
            Some(image_url) => (
                self.method_url("sendPhoto"),
                json!({
                    "chat_id": self.config.chat_id,
                    "parse_mode": "Markdown",
                    "photo": image_url,
                    "caption": caption,
                }),
            ),
            None => (
                self.method_url("sendMessage"),
                json!({
                    "chat_id": self.config.chat_id,
                    "parse_mode": "Markdown",
                    "text": caption,
                }),
            ),
        };

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    tracing::warn!("Telegram rejected alert: {}", status);
                    return false;
                }
                match response.json::<SendResponse>().await {
                    Ok(body) if body.ok => true,
                    Ok(_) => {
                        tracing::warn!("Telegram responded with ok=false");
                        false
                    }
                    Err(e) => {
                        tracing::warn!("unreadable Telegram response: {}", e);
                        false
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Telegram alert failed: {}", e);
                false
            }
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base, self.config.bot_token, method
        )
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn send_alert(&self, listing: &Listing) -> bool {
        TelegramNotifier::send_alert(self, listing).await
    }
}

/// Markdown caption shared by the photo and text delivery modes. The deep
/// link appears in both.
fn build_caption(listing: &Listing) -> String {
    format!(
        "🎯 *eBay Deal Alert*\n\n*{}*\n💰 ${:.2}\n\n[Open in eBay App]({})\n[View on Web]({})",
        listing.title,
        listing.price,
        deep_link(&listing.id),
        listing.web_url
    )
}
