pub mod orchestrator;

pub use orchestrator::{AlertSink, DealPipeline, ListingSource, RunOutcome};
