use async_trait::async_trait;

use crate::api::types::{Listing, SearchQuery};
use crate::core::error::Error;

/// Search side of the pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn find_best_listing(&self, query: &SearchQuery) -> Result<Option<Listing>, Error>;
}

/// Delivery side of the pipeline. Returns `false` on delivery failure
/// instead of raising.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send_alert(&self, listing: &Listing) -> bool;
}

/// What a run accomplished. All variants exit the process with status
/// zero; only propagated errors are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    AlertSent,
    NoMatch,
    AlertFailed,
}

/// Sequences one search and at most one notification per run.
pub struct DealPipeline<S, N> {
    source: S,
    sink: N,
    query: SearchQuery,
}

impl<S: ListingSource, N: AlertSink> DealPipeline<S, N> {
    pub fn new(source: S, sink: N, query: SearchQuery) -> Self {
        Self {
            source,
            sink,
            query,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome, Error> {
        tracing::info!(
            "🔍 Searching for '{}' under ${:.2}",
            self.query.term,
            self.query.max_price
        );

        let listing = match self.source.find_best_listing(&self.query).await? {
            Some(listing) => listing,
            None => {
                tracing::info!("No matching listings found");
                return Ok(RunOutcome::NoMatch);
            }
        };

        tracing::info!("🎯 Best match: '{}' at ${:.2}", listing.title, listing.price);

        if self.sink.send_alert(&listing).await {
            Ok(RunOutcome::AlertSent)
        } else {
            Ok(RunOutcome::AlertFailed)
        }
    }
}
