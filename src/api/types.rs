use serde::Deserialize;

use crate::core::config::SearchConfig;
use crate::core::error::Error;

/// Immutable input to a single search call.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub term: String,
    pub max_price: f64,
    pub blocked_words: Vec<String>,
}

impl From<&SearchConfig> for SearchQuery {
    fn from(search: &SearchConfig) -> Self {
        Self {
            term: search.search_term.clone(),
            max_price: search.max_price,
            blocked_words: search.blocked_words.clone(),
        }
    }
}

/// One qualifying marketplace listing. The price has already been coerced
/// to a number at the wire boundary; `image_url` is `None` when the item
/// carried no usable image.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub web_url: String,
}

/// OAuth client-credentials grant response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_ttl")]
    pub expires_in: i64,
}

fn default_token_ttl() -> i64 {
    7200
}

/// Browse API item-summary search response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub item_summaries: Vec<ItemSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: String,
    #[serde(default)]
    pub title: String,
    pub price: Option<ItemPrice>,
    pub image: Option<ItemImage>,
    pub item_web_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemPrice {
    pub value: RawPrice,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemImage {
    pub image_url: Option<String>,
}

/// The API documents `price.value` as a string but clients have observed
/// bare numbers too; accept both and normalize once, here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(f64),
}

impl RawPrice {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawPrice::Text(text) => text.trim().parse().ok(),
            RawPrice::Number(value) => Some(*value),
        }
    }
}

impl ItemSummary {
    /// Non-empty image URL, if the item has one.
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|image| image.image_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Convert into the domain model, coercing the price. An absent or
    /// unparseable price is a contract violation by the marketplace.
    pub fn into_listing(self) -> Result<Listing, Error> {
        let price = self
            .price
            .as_ref()
            .and_then(|price| price.value.as_f64())
            .ok_or_else(|| {
                Error::DataIntegrity(format!("item {} has an unusable price", self.item_id))
            })?;

        let image_url = self.image_url().map(str::to_string);

        Ok(Listing {
            id: self.item_id,
            title: self.title,
            price,
            image_url,
            web_url: self.item_web_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(raw: serde_json::Value) -> ItemSummary {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn coerces_string_price_once_at_the_boundary() {
        let listing = summary(serde_json::json!({
            "itemId": "v1|123|0",
            "title": "Steam Deck 64GB",
            "price": { "value": "19.5", "currency": "USD" },
            "image": { "imageUrl": "https://i.ebayimg.com/a.jpg" },
            "itemWebUrl": "https://www.ebay.com/itm/123"
        }))
        .into_listing()
        .unwrap();

        assert_eq!(listing.price, 19.5);
        assert_eq!(listing.image_url.as_deref(), Some("https://i.ebayimg.com/a.jpg"));
    }

    #[test]
    fn accepts_numeric_price_values() {
        let listing = summary(serde_json::json!({
            "itemId": "v1|124|0",
            "title": "Steam Deck dock",
            "price": { "value": 42.0 },
            "image": { "imageUrl": "https://i.ebayimg.com/b.jpg" },
            "itemWebUrl": "https://www.ebay.com/itm/124"
        }))
        .into_listing()
        .unwrap();

        assert_eq!(listing.price, 42.0);
    }

    #[test]
    fn unparseable_price_is_a_data_integrity_error() {
        let err = summary(serde_json::json!({
            "itemId": "v1|125|0",
            "title": "Mystery box",
            "price": { "value": "call for price" },
            "image": { "imageUrl": "https://i.ebayimg.com/c.jpg" },
            "itemWebUrl": "https://www.ebay.com/itm/125"
        }))
        .into_listing()
        .unwrap_err();

        assert!(matches!(err, Error::DataIntegrity(_)));
    }

    #[test]
    fn missing_price_is_a_data_integrity_error() {
        let err = summary(serde_json::json!({
            "itemId": "v1|126|0",
            "title": "No price at all",
            "image": { "imageUrl": "https://i.ebayimg.com/d.jpg" },
            "itemWebUrl": "https://www.ebay.com/itm/126"
        }))
        .into_listing()
        .unwrap_err();

        assert!(matches!(err, Error::DataIntegrity(_)));
    }

    #[test]
    fn empty_image_url_is_treated_as_missing() {
        let item = summary(serde_json::json!({
            "itemId": "v1|127|0",
            "title": "Blurry photo special",
            "price": { "value": "10.00" },
            "image": { "imageUrl": "" },
            "itemWebUrl": "https://www.ebay.com/itm/127"
        }));

        assert!(item.image_url().is_none());
        assert!(item.into_listing().unwrap().image_url.is_none());
    }
}
