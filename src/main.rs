use std::sync::Arc;

use anyhow::Result;

use ebay_deal_sniper::api::{EbayClient, SearchQuery};
use ebay_deal_sniper::core::{logging, Config, SystemClock};
use ebay_deal_sniper::notify::TelegramNotifier;
use ebay_deal_sniper::pipeline::{DealPipeline, RunOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init_logging(&config.log_level);

    tracing::info!("🔎 eBay Deal Sniper starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let clock = Arc::new(SystemClock);
    let source = EbayClient::new(config.ebay.clone(), clock)?;
    let sink = TelegramNotifier::new(config.telegram.clone())?;
    let query = SearchQuery::from(&config.search);

    let pipeline = DealPipeline::new(source, sink, query);

    match pipeline.run().await {
        Ok(RunOutcome::AlertSent) => tracing::info!("✅ Deal alert sent successfully!"),
        Ok(RunOutcome::NoMatch) => tracing::info!("No matching listings found today"),
        Ok(RunOutcome::AlertFailed) => tracing::warn!("⚠️ Failed to send Telegram alert"),
        Err(e) => {
            tracing::error!("❌ {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
