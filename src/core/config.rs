use std::env;

use serde::Deserialize;

use super::error::Error;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const EBAY_API_BASE: &str = "https://api.ebay.com";
const EBAY_TOKEN_URL: &str = "https://api.ebay.com/identity/v1/oauth2/token";
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub ebay: EbayConfig,
    pub telegram: TelegramConfig,
    pub search: SearchConfig,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct EbayConfig {
    pub client_id: String,
    pub client_secret: String,
    pub marketplace_id: String,
    pub api_base: String,
    pub token_url: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

/// Search parameters, read from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub search_term: String,
    pub max_price: f64,
    #[serde(default)]
    pub blocked_words: Vec<String>,
}

impl Config {
    /// Secrets come from the environment (a `.env` file is honored),
    /// search parameters from `config.toml` (path overridable via
    /// `CONFIG_PATH`). Missing secrets fail here, before any network call.
    pub fn load() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let search = SearchConfig::from_file(&path)?;

        Ok(Config {
            ebay: EbayConfig {
                client_id: require_env("EBAY_CLIENT_ID")?,
                client_secret: require_env("EBAY_CLIENT_SECRET")?,
                marketplace_id: env::var("EBAY_MARKETPLACE_ID")
                    .unwrap_or_else(|_| "EBAY_US".to_string()),
                api_base: EBAY_API_BASE.to_string(),
                token_url: EBAY_TOKEN_URL.to_string(),
            },
            telegram: TelegramConfig {
                bot_token: require_env("TG_BOT_TOKEN")?,
                chat_id: require_env("CHAT_ID")?,
                api_base: TELEGRAM_API_BASE.to_string(),
            },
            search,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl SearchConfig {
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let settings = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml))
            .build()
            .map_err(|e| Error::Configuration(format!("cannot read {}: {}", path, e)))?;

        let search: SearchConfig = settings
            .try_deserialize()
            .map_err(|e| Error::Configuration(format!("invalid {}: {}", path, e)))?;

        search.validate()?;
        Ok(search)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.search_term.trim().is_empty() {
            return Err(Error::Configuration("search_term must not be empty".into()));
        }
        if self.max_price <= 0.0 {
            return Err(Error::Configuration("max_price must be positive".into()));
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String, Error> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Configuration(format!("{} must be set", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_toml(raw: &str) -> Result<SearchConfig, Error> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        let search: SearchConfig = settings
            .try_deserialize()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        search.validate()?;
        Ok(search)
    }

    #[test]
    fn parses_search_config() {
        let search = parse_toml(
            r#"
            search_term = "gpu rtx 3060"
            max_price = 180.0
            blocked_words = ["broken", "parts only"]
            "#,
        )
        .unwrap();

        assert_eq!(search.search_term, "gpu rtx 3060");
        assert_eq!(search.max_price, 180.0);
        assert_eq!(search.blocked_words, vec!["broken", "parts only"]);
    }

    #[test]
    fn blocked_words_default_to_empty() {
        let search = parse_toml(
            r#"
            search_term = "mechanical keyboard"
            max_price = 50.0
            "#,
        )
        .unwrap();

        assert!(search.blocked_words.is_empty());
    }

    #[test]
    fn rejects_non_positive_price() {
        let err = parse_toml(
            r#"
            search_term = "ssd"
            max_price = 0.0
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn rejects_blank_search_term() {
        let err = parse_toml(
            r#"
            search_term = "  "
            max_price = 20.0
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn missing_env_var_is_a_configuration_error() {
        let err = require_env("EBAY_DEAL_SNIPER_TEST_UNSET_VAR").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("EBAY_DEAL_SNIPER_TEST_UNSET_VAR"));
    }

    #[test]
    fn blank_env_var_is_a_configuration_error() {
        env::set_var("EBAY_DEAL_SNIPER_TEST_BLANK_VAR", "   ");
        let err = require_env("EBAY_DEAL_SNIPER_TEST_BLANK_VAR").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
