use thiserror::Error;

/// Failure taxonomy for one pipeline run.
///
/// A failed Telegram delivery is not an error: the notifier reports it as
/// `false` so the run can finish cleanly after a successful search.
#[derive(Debug, Error)]
pub enum Error {
    /// A required secret or config value is missing or invalid. Raised
    /// before any network call, never retried.
    #[error("missing configuration: {0}")]
    Configuration(String),

    /// The OAuth token endpoint refused or failed to issue a token.
    #[error("token request failed: {0}")]
    AuthRequest(String),

    /// The item search call failed (transport error or bad status).
    #[error("search request failed: {0}")]
    SearchRequest(String),

    /// The marketplace returned data that violates its own contract,
    /// e.g. an unparseable price value.
    #[error("malformed marketplace data: {0}")]
    DataIntegrity(String),
}

impl Error {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::AuthRequest(_) | Error::SearchRequest(_))
    }
}
