#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use ebay_deal_sniper::core::config::{EbayConfig, TelegramConfig};
use ebay_deal_sniper::core::Clock;

/// Clock whose time only moves when a test says so.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.now.lock().unwrap() += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn ebay_config(base: &str) -> EbayConfig {
    let base = base.trim_end_matches('/');
    EbayConfig {
        client_id: "test-client-id".into(),
        client_secret: "test-client-secret".into(),
        marketplace_id: "EBAY_US".into(),
        api_base: base.to_string(),
        token_url: format!("{}/identity/v1/oauth2/token", base),
    }
}

pub fn telegram_config(base: &str) -> TelegramConfig {
    TelegramConfig {
        bot_token: "test-bot-token".into(),
        chat_id: "424242".into(),
        api_base: base.trim_end_matches('/').to_string(),
    }
}
