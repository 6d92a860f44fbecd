// src/config.rs
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use reqwest::Url;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://stockanalyzer-qtk1.onrender.com";
pub const DEFAULT_MODEL_PATH: &str = "tf.keras";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub news_api_key: Option<String>,
    /// Serialized origin (`scheme://host[:port]`) allowed by CORS.
    pub allowed_origin: String,
    pub model_path: PathBuf,
    pub yahoo_base_url: String,
    pub news_api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got {:?}", value))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };
        info!("Using PORT: {}", port);

        let news_api_key = lookup("NEWS_API_KEY").filter(|key| !key.is_empty());
        if news_api_key.is_none() {
            warn!("NEWS_API_KEY not set, news lookups will come back empty");
        }

        let origin = lookup("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let allowed_origin = parse_origin(&origin)?;

        Ok(Self {
            port,
            news_api_key,
            allowed_origin,
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
            news_api_base_url: lookup("NEWS_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NEWS_API_BASE_URL.to_string()),
        })
    }
}

fn parse_origin(value: &str) -> Result<String> {
    let url = Url::parse(value.trim()).with_context(|| format!("ALLOWED_ORIGIN is not a URL: {:?}", value))?;
    if url.host_str().is_none() {
        return Err(anyhow!("ALLOWED_ORIGIN has no host: {:?}", value));
    }
    Ok(url.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.news_api_key, None);
        assert_eq!(config.allowed_origin, "https://stockanalyzer-qtk1.onrender.com");
        assert_eq!(config.model_path, PathBuf::from("tf.keras"));
        assert_eq!(config.yahoo_base_url, DEFAULT_YAHOO_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("NEWS_API_KEY", "secret"),
            ("ALLOWED_ORIGIN", "http://localhost:3000/"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.news_api_key.as_deref(), Some("secret"));
        assert_eq!(config.allowed_origin, "http://localhost:3000");
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT must be a number"));
    }

    #[test]
    fn test_invalid_origin() {
        assert!(config_from(&[("ALLOWED_ORIGIN", "not a url")]).is_err());
    }
}
