// src/services/market_data.rs
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use futures::StreamExt;
use log::{error, info, warn};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{round_to, QuoteRow, StockSnapshot};

/// Upper bound on in-flight requests during a batch fetch.
pub const BATCH_CONCURRENCY: usize = 8;

/// Period used for single-session lookups.
pub const LATEST_SESSION: &str = "1d";

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Provider(String),

    #[error("no data found for {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolProfile {
    pub long_name: Option<String>,
    pub exchange: Option<String>,
}

/// The latest session's rows together with the symbol's profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub rows: Vec<QuoteRow>,
    pub profile: SymbolProfile,
}

impl Session {
    pub fn snapshot(&self) -> StockSnapshot {
        let latest = self.rows.first();
        let price = |pick: fn(&QuoteRow) -> Option<f64>| latest.and_then(pick).map(|v| round_to(v, 2));

        StockSnapshot {
            name: self.profile.long_name.clone(),
            open: price(|r| r.open),
            close: price(|r| r.close),
            low: price(|r| r.low),
            high: price(|r| r.high),
            exchange: self.profile.exchange.clone(),
        }
    }
}

#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily rows for `period` (a provider range token such as `1mo` or `5y`),
    /// ascending and unique by date, prices as reported.
    async fn history(&self, ticker: &str, period: &str) -> Result<Vec<QuoteRow>, MarketDataError>;

    async fn profile(&self, ticker: &str) -> Result<SymbolProfile, MarketDataError>;

    /// Latest session plus profile. Providers that return both in one
    /// response should override this.
    async fn session(&self, ticker: &str) -> Result<Session, MarketDataError> {
        let rows = self.history(ticker, LATEST_SESSION).await?;
        let profile = self.profile(ticker).await?;
        Ok(Session { rows, profile })
    }

    async fn snapshot(&self, ticker: &str) -> Result<StockSnapshot, MarketDataError> {
        Ok(self.session(ticker).await?.snapshot())
    }

    /// Sessions for every ticker. A ticker that fails is logged and left out
    /// of the map, so the map may be empty.
    async fn daily_batch(&self, tickers: &[String]) -> HashMap<String, Session> {
        let results: Vec<(String, Result<Session, MarketDataError>)> =
            futures::stream::iter(tickers.iter().cloned())
                .map(|ticker| async move {
                    let result = self.session(&ticker).await;
                    (ticker, result)
                })
                .buffer_unordered(BATCH_CONCURRENCY)
                .collect()
                .await;

        let mut batch = HashMap::with_capacity(results.len());
        for (ticker, result) in results {
            match result {
                Ok(session) => {
                    batch.insert(ticker, session);
                }
                Err(e) => warn!("Error fetching data for {}: {}", ticker, e),
            }
        }
        batch
    }
}

// Minimal v8 chart response structs (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    exchange_name: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl ChartResult {
    fn profile(&self) -> SymbolProfile {
        SymbolProfile {
            long_name: self.meta.long_name.clone(),
            exchange: self.meta.exchange_name.clone(),
        }
    }

    fn into_rows(self) -> Result<Vec<QuoteRow>, MarketDataError> {
        let offset = self.meta.gmtoffset;
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();
        let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

        let mut rows = Vec::with_capacity(self.timestamp.len());
        for (i, ts) in self.timestamp.iter().enumerate() {
            rows.push(QuoteRow {
                date: session_date(*ts, offset)?,
                open: at(quote.open.as_slice(), i),
                high: at(quote.high.as_slice(), i),
                low: at(quote.low.as_slice(), i),
                close: at(quote.close.as_slice(), i),
                volume: quote.volume.get(i).copied().flatten(),
            });
        }

        rows.sort_by_key(|r| r.date);
        // keep the most recent row for a date
        rows.dedup_by(|later, earlier| {
            if later.date == earlier.date {
                std::mem::swap(later, earlier);
                true
            } else {
                false
            }
        });
        Ok(rows)
    }
}

/// Trading date in the exchange's own timezone.
fn session_date(timestamp: i64, gmtoffset: i64) -> Result<NaiveDate, MarketDataError> {
    timestamp
        .checked_add(gmtoffset)
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.date_naive())
        .ok_or_else(|| MarketDataError::Parse(format!("bad timestamp {}", timestamp)))
}

/// Yahoo Finance v8 chart API.
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, ticker: &str) -> Result<Url, MarketDataError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| MarketDataError::Parse(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MarketDataError::Parse(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", ticker]);
        Ok(url)
    }

    async fn chart(&self, ticker: &str, period: &str) -> Result<ChartResult, MarketDataError> {
        let url = self.chart_url(ticker)?;
        info!("Fetching {} chart for {} from {}", period, ticker, url);

        let resp = self
            .client
            .get(url)
            .query(&[("range", period), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| {
                error!("Chart request for {} failed: {}", ticker, e);
                MarketDataError::Network(e.to_string())
            })?;

        let status = resp.status();
        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(format!("HTTP {}: {}", status, e)))?;

        parse_chart(ticker, body)
    }
}

fn parse_chart(ticker: &str, body: ChartResponse) -> Result<ChartResult, MarketDataError> {
    if let Some(err) = body.chart.error {
        error!("Provider error for {}: {} ({})", ticker, err.description, err.code);
        return Err(if err.code == "Not Found" {
            MarketDataError::NotFound(ticker.to_string())
        } else {
            MarketDataError::Provider(err.description)
        });
    }

    body.chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
}

#[async_trait]
impl MarketData for YahooClient {
    async fn history(&self, ticker: &str, period: &str) -> Result<Vec<QuoteRow>, MarketDataError> {
        let rows = self.chart(ticker, period).await?.into_rows()?;
        info!("Fetched {} rows of {} history for {}", rows.len(), period, ticker);
        Ok(rows)
    }

    async fn profile(&self, ticker: &str) -> Result<SymbolProfile, MarketDataError> {
        Ok(self.chart(ticker, LATEST_SESSION).await?.profile())
    }

    async fn session(&self, ticker: &str) -> Result<Session, MarketDataError> {
        let result = self.chart(ticker, LATEST_SESSION).await?;
        let profile = result.profile();
        Ok(Session {
            rows: result.into_rows()?,
            profile,
        })
    }
}
