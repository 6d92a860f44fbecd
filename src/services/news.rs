// src/services/news.rs
use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::market_data::{MarketData, MarketDataError, SymbolProfile};

/// Articles returned per lookup.
pub const MAX_ARTICLES: usize = 3;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("{0}")]
    Lookup(#[from] MarketDataError),

    #[error("{0}")]
    Transport(String),
}

/// Keyword news search. A provider-reported failure is an empty result, not
/// an error; only transport and decoding problems are errors.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Value>, NewsError>;
}

/// Company names such as "M&M" break the provider's query parsing.
pub fn search_query(company_name: &str) -> String {
    company_name.replace('&', "and")
}

/// Up to [`MAX_ARTICLES`] articles about the company behind `ticker`, searched
/// by its long name (the ticker itself when the provider has none).
pub async fn fetch_stock_news(
    market: &dyn MarketData,
    news: &dyn NewsSource,
    ticker: &str,
) -> Result<Vec<Value>, NewsError> {
    let profile = market.profile(ticker).await?;
    company_news(news, ticker, &profile).await
}

/// Like [`fetch_stock_news`] for a profile the caller already holds.
pub async fn company_news(
    news: &dyn NewsSource,
    ticker: &str,
    profile: &SymbolProfile,
) -> Result<Vec<Value>, NewsError> {
    let company_name = profile.long_name.as_deref().unwrap_or(ticker);
    let query = search_query(company_name);

    let mut articles = news.search(&query).await?;
    articles.truncate(MAX_ARTICLES);
    Ok(articles)
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: Option<String>,
    #[serde(default)]
    articles: Vec<Value>,
    message: Option<String>,
}

/// NewsAPI `everything` endpoint.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("stock-analyzer-backend/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn everything_url(&self) -> String {
        format!("{}/v2/everything", self.base_url.trim_end_matches('/'))
    }
}

fn articles_from(body: NewsApiResponse) -> Vec<Value> {
    if body.status.as_deref() == Some("ok") {
        body.articles
    } else {
        warn!(
            "News provider returned status {:?}: {}",
            body.status,
            body.message.unwrap_or_default()
        );
        Vec::new()
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Value>, NewsError> {
        info!("Searching news for: {}", query);

        let mut request = self.client.get(self.everything_url()).query(&[("q", query)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apiKey", key.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            error!("News request failed: {}", e);
            NewsError::Transport(e.to_string())
        })?;

        let body: NewsApiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse news response: {}", e);
            NewsError::Transport(e.to_string())
        })?;

        Ok(articles_from(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeMarket, FakeNews};
    use serde_json::json;

    #[test]
    fn test_search_query_replaces_ampersand() {
        assert_eq!(search_query("Mahindra & Mahindra Limited"), "Mahindra and Mahindra Limited");
        assert_eq!(search_query("Apple Inc."), "Apple Inc.");
    }

    #[test]
    fn test_articles_from_non_ok_status_is_empty() {
        let body: NewsApiResponse = serde_json::from_value(json!({
            "status": "error",
            "code": "apiKeyMissing",
            "message": "Your API key is missing."
        }))
        .unwrap();
        assert!(articles_from(body).is_empty());
    }

    #[test]
    fn test_articles_from_ok_passes_through() {
        let body: NewsApiResponse = serde_json::from_value(json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{"title": "Apple ships", "source": {"id": null, "name": "Wire"}}]
        }))
        .unwrap();
        let articles = articles_from(body);
        assert_eq!(articles, vec![json!({"title": "Apple ships", "source": {"id": null, "name": "Wire"}})]);
    }

    #[test]
    fn test_everything_url() {
        let client = NewsApiClient::new("https://newsapi.org/", None);
        assert_eq!(client.everything_url(), "https://newsapi.org/v2/everything");
    }

    #[tokio::test]
    async fn test_fetch_stock_news_uses_company_name_and_limits() {
        let market = FakeMarket::new()
            .with_history("M&M.NS", Vec::new())
            .with_profile("M&M.NS", "Mahindra & Mahindra Limited", "NSI");
        let articles: Vec<Value> = (0..5).map(|i| json!({ "title": format!("story {}", i) })).collect();
        let news = FakeNews::new(articles);

        let found = fetch_stock_news(&market, &news, "M&M.NS").await.unwrap();
        assert_eq!(found.len(), MAX_ARTICLES);
        assert_eq!(found[0]["title"], "story 0");
        assert_eq!(news.queries(), vec!["Mahindra and Mahindra Limited".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_stock_news_falls_back_to_ticker() {
        let market = FakeMarket::new().with_history("XYZ", Vec::new());
        let news = FakeNews::new(Vec::new());

        let found = fetch_stock_news(&market, &news, "XYZ").await.unwrap();
        assert!(found.is_empty());
        assert_eq!(news.queries(), vec!["XYZ".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_stock_news_transport_error_keeps_text() {
        let market = FakeMarket::new().with_history("AAPL", Vec::new());
        let news = FakeNews::unreachable("dns error: failed to lookup address");

        let err = fetch_stock_news(&market, &news, "AAPL").await.unwrap_err();
        assert_eq!(err.to_string(), "dns error: failed to lookup address");
    }
}
