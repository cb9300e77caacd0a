pub mod auth;
pub mod ebay;
pub mod types;

pub use auth::AppTokenCache;
pub use ebay::EbayClient;
pub use types::{Listing, SearchQuery};
